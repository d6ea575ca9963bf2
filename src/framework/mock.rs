//! # Mock Framework
//!
//! Utilities for testing pipeline stages in isolation.
//!
//! - [`RecordingSink`] stands in for the event system and keeps every event it is sent.
//! - [`MockWorker`] stands in for a barista: it records the orders it was handed and
//!   the availability transitions the pool drove it through.
//! - [`latte`], [`catalog`], [`customer`] and [`order`] build small fixtures.
//!
//! # Example
//! ```ignore
//! let sink = Arc::new(RecordingSink::new());
//! let worker = Arc::new(MockWorker::new(1).with_delay(Duration::from_secs(1)));
//! // hand them to the stage under test...
//! assert_eq!(worker.processed(), vec![OrderId(1)]);
//! assert_eq!(sink.completed(), vec![OrderId(1)]);
//! ```

use crate::clients::EventSink;
use crate::error::ShopError;
use crate::framework::{Worker, WorkerStatus};
use crate::model::{Catalog, CoffeeSize, CoffeeSpec, Customer, Order, OrderId, OrderPhase};
use crate::monitor::Event;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

// =============================================================================
// FIXTURES
// =============================================================================

/// Latte with ratio 0.05, price 3.50, 8 oz.
pub fn latte() -> CoffeeSpec {
    CoffeeSpec {
        name: "Latte".to_string(),
        beans_to_water_ratio: BigDecimal::new(5i64.into(), 2),
        price: BigDecimal::new(350i64.into(), 2),
        size_in_ounces: 8,
    }
}

/// One-entry catalog holding [`latte`].
pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![latte()]).expect("catalog with one entry"))
}

pub fn customer(name: &str) -> Arc<Customer> {
    Arc::new(Customer::new(name, catalog()))
}

/// A standard latte with no extras, ordered by a fresh customer named after `id`.
pub fn order(id: u64) -> Arc<Order> {
    let customer = customer(&format!("customer_{id}"));
    Arc::new(Order::new(OrderId(id), customer, latte(), CoffeeSize::Standard, vec![]))
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// [`EventSink`] that keeps every event in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn received(&self) -> Vec<OrderId> {
        self.ids(|e| matches!(e, Event::OrderReceived(_)))
    }

    pub fn processed(&self) -> Vec<OrderId> {
        self.ids(|e| matches!(e, Event::OrderProcessed(_)))
    }

    pub fn completed(&self) -> Vec<OrderId> {
        self.ids(|e| matches!(e, Event::OrderCompleted(_)))
    }

    fn ids(&self, keep: impl Fn(&Event) -> bool) -> Vec<OrderId> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| keep(e))
            .map(|e| e.order().id())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send_event(&self, event: Event) -> Result<(), ShopError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

// =============================================================================
// MOCK WORKER
// =============================================================================

/// Scripted [`Worker`]: sleeps for a fixed delay per order and optionally fails.
pub struct MockWorker {
    id: usize,
    busy: AtomicBool,
    delay: Duration,
    fail: bool,
    processed: Mutex<Vec<OrderId>>,
    transitions: Mutex<Vec<WorkerStatus>>,
}

impl MockWorker {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            busy: AtomicBool::new(false),
            delay: Duration::ZERO,
            fail: false,
            processed: Mutex::new(Vec::new()),
            transitions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every `process_order` call fails after recording the order.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn processed(&self) -> Vec<OrderId> {
        self.processed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn transitions(&self) -> Vec<WorkerStatus> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, status: WorkerStatus) {
        self.busy
            .store(status == WorkerStatus::Busy, Ordering::SeqCst);
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status);
    }
}

#[async_trait]
impl Worker for MockWorker {
    fn id(&self) -> usize {
        self.id
    }

    fn status(&self) -> WorkerStatus {
        if self.busy.load(Ordering::SeqCst) {
            WorkerStatus::Busy
        } else {
            WorkerStatus::Available
        }
    }

    fn mark_available(&self) {
        self.set(WorkerStatus::Available);
    }

    fn mark_busy(&self) {
        self.set(WorkerStatus::Busy);
    }

    async fn process_order(&self, order: Arc<Order>) -> Result<(), ShopError> {
        self.processed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order.id());
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(ShopError::InvalidTransition {
                order: order.id(),
                from: order.phase(),
                to: OrderPhase::Processing,
            });
        }
        Ok(())
    }
}
