//! # Metrics
//!
//! Running totals kept by the event sidecar. Counts and duration sums live under a
//! single lock so a summary is always a consistent snapshot.

use crate::monitor::Event;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Totals {
    received: u64,
    processed: u64,
    completed: u64,
    grind: Duration,
    brew: Duration,
    wait: Duration,
    processing: Duration,
}

/// Aggregated order metrics.
#[derive(Debug, Default)]
pub struct Metrics {
    totals: Mutex<Totals>,
}

/// Point-in-time view of [`Metrics`].
///
/// Averages are per completed order and absent while nothing has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub received_orders: u64,
    pub processed_orders: u64,
    pub completed_orders: u64,
    pub average_grind_time: Option<Duration>,
    pub average_brew_time: Option<Duration>,
    pub average_wait_time: Option<Duration>,
    pub average_processing_time: Option<Duration>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the totals.
    pub fn record(&self, event: &Event) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        match event {
            Event::OrderReceived(_) => totals.received += 1,
            Event::OrderProcessed(_) => totals.processed += 1,
            Event::OrderCompleted(order) => {
                let coffee = order.coffee();
                totals.completed += 1;
                totals.grind += coffee.grind_time().unwrap_or_default();
                totals.brew += coffee.brew_time().unwrap_or_default();
                totals.wait += order.customer().wait_time();
                totals.processing += order.processing_time();
            }
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        let per_order = |sum: Duration| average(sum, totals.completed);
        MetricsSummary {
            received_orders: totals.received,
            processed_orders: totals.processed,
            completed_orders: totals.completed,
            average_grind_time: per_order(totals.grind),
            average_brew_time: per_order(totals.brew),
            average_wait_time: per_order(totals.wait),
            average_processing_time: per_order(totals.processing),
        }
    }
}

fn average(sum: Duration, count: u64) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    let nanos = sum.as_nanos() / u128::from(count);
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}
