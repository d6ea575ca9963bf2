//! Barista: takes an order from grind to hand-over.

use crate::brewer_actor::BrewerPool;
use crate::clients::EventSink;
use crate::error::ShopError;
use crate::framework::{Outstanding, Worker, WorkerStatus};
use crate::grinder_actor::GrinderPool;
use crate::model::Order;
use crate::monitor::Event;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct Barista {
    id: usize,
    busy: AtomicBool,
    grinders: Arc<GrinderPool>,
    brewers: Arc<BrewerPool>,
    events: Arc<dyn EventSink>,
    outstanding: Outstanding,
}

impl Barista {
    pub fn new(
        id: usize,
        grinders: Arc<GrinderPool>,
        brewers: Arc<BrewerPool>,
        events: Arc<dyn EventSink>,
        outstanding: Outstanding,
    ) -> Self {
        Self {
            id,
            busy: AtomicBool::new(false),
            grinders,
            brewers,
            events,
            outstanding,
        }
    }

    /// Leases a grinder, waits for the beans, and gives the grinder back.
    async fn grind(&self, order: &Arc<Order>) -> Result<(), ShopError> {
        let grinder = self.grinders.lease().await?;
        info!(barista = self.id, grinder = grinder.tag(), order = %order.id(), "Grinding");
        let ground = async {
            grinder.submit(order.clone()).await?;
            order.coffee().beans_ready().await
        }
        .await;
        self.grinders.release(grinder);
        ground
    }

    /// Leases a brewer, waits for the water, and gives the brewer back.
    async fn brew(&self, order: &Arc<Order>) -> Result<(), ShopError> {
        let brewer = self.brewers.lease().await?;
        info!(barista = self.id, brewer = brewer.tag(), order = %order.id(), "Brewing");
        let brewed = async {
            brewer.submit(order.clone()).await?;
            order.coffee().water_ready().await
        }
        .await;
        self.brewers.release(brewer);
        brewed
    }

    async fn prepare(&self, order: &Arc<Order>) -> Result<(), ShopError> {
        order.start_processing()?;
        self.report(Event::OrderProcessed(order.clone())).await;
        self.grind(order).await?;
        self.brew(order).await?;
        order.complete()
    }

    async fn report(&self, event: Event) {
        if let Err(e) = self.events.send_event(event).await {
            error!(barista = self.id, error = %e, "Event dropped");
        }
    }
}

#[async_trait]
impl Worker for Barista {
    fn id(&self) -> usize {
        self.id
    }

    fn status(&self) -> WorkerStatus {
        if self.busy.load(Ordering::Acquire) {
            WorkerStatus::Busy
        } else {
            WorkerStatus::Available
        }
    }

    fn mark_available(&self) {
        self.busy.store(false, Ordering::Release);
    }

    fn mark_busy(&self) {
        self.busy.store(true, Ordering::Release);
    }

    #[instrument(skip(self, order), fields(barista = self.id, order = %order.id()))]
    async fn process_order(&self, order: Arc<Order>) -> Result<(), ShopError> {
        info!(customer = order.customer().name(), "Barista is processing order");
        let prepared = self.prepare(&order).await;
        if prepared.is_ok() {
            // Reported before the count drops so `stop()` after `wait_for_orders()` sees it.
            self.report(Event::OrderCompleted(order.clone())).await;
        }
        // A failed order will never complete; count it down all the same.
        self.outstanding.done()?;
        prepared?;

        info!(
            customer = order.customer().name(),
            processing_time = ?order.processing_time(),
            "Barista is done processing order"
        );
        Ok(())
    }
}
