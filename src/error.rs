//! Error types for the coffee shop pipeline.
//!
//! Runtime errors are all invariant violations or teardown conditions: nothing in the
//! pipeline retries. Each variant carries the identity of the order or machine involved
//! so the task that hits it can log an attributable failure.

use crate::framework::SignalError;
use crate::model::{OrderId, OrderPhase};
use thiserror::Error;

/// Errors raised while the pipeline is running.
#[derive(Debug, Error, PartialEq)]
pub enum ShopError {
    /// An order was asked to move to a phase that does not follow its current one.
    #[error("Order {order} cannot move from {from} to {to}")]
    InvalidTransition {
        order: OrderId,
        from: OrderPhase,
        to: OrderPhase,
    },

    /// A one-shot readiness signal was misused for this order's coffee.
    #[error("Order {order}: {source}")]
    Signal {
        order: OrderId,
        #[source]
        source: SignalError,
    },

    /// A duration field on the coffee was already recorded.
    #[error("Order {order}: {field} time already recorded")]
    DurationAlreadySet { order: OrderId, field: &'static str },

    /// A customer's departure was set twice.
    #[error("Customer {customer} already departed")]
    AlreadyDeparted { customer: String },

    /// A machine received a job while still processing another.
    #[error("{kind} {tag} is busy, rejected order {order}")]
    MachineBusy {
        kind: &'static str,
        tag: String,
        order: OrderId,
    },

    /// The machine's processing loop has exited.
    #[error("{kind} {tag} stopped")]
    MachineStopped { kind: &'static str, tag: String },

    /// The pool was closed while a lease was pending.
    #[error("{kind} pool closed")]
    PoolClosed { kind: &'static str },

    /// The catalog has no coffee types to pick from.
    #[error("Coffee catalog is empty")]
    EmptyCatalog,

    /// Every subscriber of the order queue is gone.
    #[error("Order queue closed, dropped order {order}")]
    OrderQueueClosed { order: OrderId },

    /// A cashier's customer queue is closed.
    #[error("Cashier {cashier} closed")]
    CashierClosed { cashier: usize },

    /// The event system no longer accepts events.
    #[error("Event system stopped")]
    EventSystemStopped,

    /// A summary was requested before the event system drained.
    #[error("Event system still running, stop it before reading the summary")]
    EventSystemRunning,

    /// More completions were reported than orders were served.
    #[error("Outstanding order counter underflow")]
    CounterUnderflow,
}
