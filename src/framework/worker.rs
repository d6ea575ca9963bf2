use crate::error::ShopError;
use crate::model::Order;
use async_trait::async_trait;
use std::sync::Arc;

/// Availability of a worker, as seen by the pool driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Available,
    Busy,
}

/// A worker pulling orders off the shared order queue.
///
/// The pool calls `mark_busy` before and `mark_available` after every
/// `process_order`, whatever its outcome.
#[async_trait]
pub trait Worker: Send + Sync {
    fn id(&self) -> usize;

    fn status(&self) -> WorkerStatus;

    fn mark_available(&self);

    fn mark_busy(&self);

    async fn process_order(&self, order: Arc<Order>) -> Result<(), ShopError>;
}
