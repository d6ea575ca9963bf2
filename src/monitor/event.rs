use crate::model::Order;
use std::fmt::{self, Display};
use std::sync::Arc;

/// Lifecycle event observed by the metrics sidecar. Each one is consumed once.
#[derive(Debug, Clone)]
pub enum Event {
    /// A cashier published the order onto the order queue.
    OrderReceived(Arc<Order>),
    /// A barista picked the order up.
    OrderProcessed(Arc<Order>),
    /// The coffee was handed over.
    OrderCompleted(Arc<Order>),
}

impl Event {
    pub fn order(&self) -> &Arc<Order> {
        match self {
            Self::OrderReceived(order)
            | Self::OrderProcessed(order)
            | Self::OrderCompleted(order) => order,
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::OrderReceived(_) => "order-received",
            Self::OrderProcessed(_) => "order-processed",
            Self::OrderCompleted(_) => "order-completed",
        };
        write!(f, "{kind}({})", self.order().id())
    }
}
