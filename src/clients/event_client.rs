use crate::error::ShopError;
use crate::monitor::Event;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, instrument};

/// Anything the pipeline can report lifecycle events to.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send_event(&self, event: Event) -> Result<(), ShopError>;
}

/// Admission gate shared by every [`EventClient`] and the event listener.
///
/// `pending` counts events admitted but not yet folded into the metrics. Once
/// `closed` is set no new event is admitted, so `pending` can only go down.
#[derive(Debug, Default)]
pub(crate) struct Intake {
    pending: AtomicUsize,
    closed: AtomicBool,
    drained: Notify,
}

impl Intake {
    fn admit(&self) -> bool {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.closed.load(Ordering::SeqCst) {
            self.settle();
            return false;
        }
        true
    }

    /// Marks one admitted event as handled.
    pub(crate) fn settle(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Stops admitting events and waits for the admitted ones to be handled.
    pub(crate) async fn close_and_drain(&self) {
        self.closed.store(true, Ordering::SeqCst);
        loop {
            let drained = self.drained.notified();
            if self.pending() == 0 {
                return;
            }
            drained.await;
        }
    }
}

/// Cloneable sender side of the event system.
#[derive(Clone)]
pub struct EventClient {
    sender: mpsc::Sender<Event>,
    intake: Arc<Intake>,
}

impl EventClient {
    pub(crate) fn new(sender: mpsc::Sender<Event>, intake: Arc<Intake>) -> Self {
        Self { sender, intake }
    }
}

#[async_trait]
impl EventSink for EventClient {
    /// Enqueues `event`, waiting while the buffer is full.
    #[instrument(skip(self, event), fields(order = %event.order().id()))]
    async fn send_event(&self, event: Event) -> Result<(), ShopError> {
        if !self.intake.admit() {
            return Err(ShopError::EventSystemStopped);
        }
        debug!(%event, "Sending event");
        if self.sender.send(event).await.is_err() {
            self.intake.settle();
            return Err(ShopError::EventSystemStopped);
        }
        Ok(())
    }
}
