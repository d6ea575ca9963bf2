//! # Event Sidecar
//!
//! A single listener task folds lifecycle events into [`Metrics`]. Producers talk to
//! it through [`EventClient`]s, bounded so a slow listener pushes back on the
//! pipeline instead of buffering without limit.
//!
//! `stop()` closes admission first, then waits until every admitted event has been
//! folded in, then ends the listener. The summary is only handed out after that.

use crate::clients::event_client::Intake;
use crate::clients::EventClient;
use crate::error::ShopError;
use crate::monitor::{Event, Metrics, MetricsSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct EventSystem {
    client: EventClient,
    intake: Arc<Intake>,
    metrics: Arc<Metrics>,
    shutdown: Arc<Notify>,
    listener: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl EventSystem {
    /// Spawns the listener. Must be called from within a Tokio runtime.
    pub fn start(buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let intake = Arc::new(Intake::default());
        let metrics = Arc::new(Metrics::new());
        let shutdown = Arc::new(Notify::new());

        let listener = tokio::spawn(listen(
            receiver,
            intake.clone(),
            metrics.clone(),
            shutdown.clone(),
        ));
        info!(buffer, "Event system started");

        Self {
            client: EventClient::new(sender, intake.clone()),
            intake,
            metrics,
            shutdown,
            listener: Mutex::new(Some(listener)),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> EventClient {
        self.client.clone()
    }

    /// Rejects new events, waits for the pending ones, then ends the listener.
    ///
    /// Concurrent callers queue on the listener lock, so every caller returns only
    /// after the drain has finished.
    pub async fn stop(&self) -> Result<(), ShopError> {
        let mut guard = self.listener.lock().await;
        let Some(listener) = guard.take() else {
            return if self.stopped.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ShopError::EventSystemStopped)
            };
        };
        info!(pending = self.intake.pending(), "Stopping event system");
        self.intake.close_and_drain().await;
        self.shutdown.notify_one();

        if let Err(e) = listener.await {
            error!("Event listener failed: {:?}", e);
            return Err(ShopError::EventSystemStopped);
        }
        self.stopped.store(true, Ordering::SeqCst);
        info!("Event system stopped");
        Ok(())
    }

    /// Final metrics. Only available once [`stop`](Self::stop) returned.
    pub fn summary(&self) -> Result<MetricsSummary, ShopError> {
        if !self.stopped.load(Ordering::SeqCst) {
            return Err(ShopError::EventSystemRunning);
        }
        Ok(self.metrics.summary())
    }

    pub fn print_summary(&self) -> Result<(), ShopError> {
        let summary = self.summary()?;
        let secs = |d: Option<std::time::Duration>| d.map(|d| d.as_secs_f64());
        info!(
            received_orders = summary.received_orders,
            processed_orders = summary.processed_orders,
            completed_orders = summary.completed_orders,
            average_grinding_time = ?secs(summary.average_grind_time),
            average_brewing_time = ?secs(summary.average_brew_time),
            average_waiting_time = ?secs(summary.average_wait_time),
            average_process_time = ?secs(summary.average_processing_time),
            "Metrics summary"
        );
        Ok(())
    }
}

async fn listen(
    mut receiver: mpsc::Receiver<Event>,
    intake: Arc<Intake>,
    metrics: Arc<Metrics>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            biased;
            Some(event) = receiver.recv() => {
                debug!(%event, "Event received");
                metrics.record(&event);
                intake.settle();
            }
            _ = shutdown.notified() => break,
        }
    }
    debug!("Event listener exited");
}
