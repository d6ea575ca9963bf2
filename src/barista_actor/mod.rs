//! Baristas and the worker pool draining the order queue.

pub mod entity;

pub use entity::*;

use crate::clients::OrderSubscription;
use crate::framework::Worker;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Fixed set of workers competing for orders on one subscription.
pub struct BaristaPool {
    workers: Vec<Arc<dyn Worker>>,
}

impl BaristaPool {
    pub fn new(workers: Vec<Arc<dyn Worker>>) -> Self {
        Self { workers }
    }

    /// Spawns one loop per worker. Each loop ends once the order queue is closed
    /// and drained.
    pub fn start(&self, orders: OrderSubscription) -> Vec<JoinHandle<()>> {
        let handles = self
            .workers
            .iter()
            .map(|worker| tokio::spawn(work(worker.clone(), orders.clone())))
            .collect();
        info!(baristas = self.workers.len(), "All baristas are started");
        handles
    }
}

async fn work(worker: Arc<dyn Worker>, orders: OrderSubscription) {
    worker.mark_available();
    while let Some(order) = orders.next().await {
        worker.mark_busy();
        let id = order.id();
        if let Err(e) = worker.process_order(order).await {
            error!(barista = worker.id(), order = %id, error = %e, "Order failed");
        }
        worker.mark_available();
    }
    info!(barista = worker.id(), "Barista stopped");
}
