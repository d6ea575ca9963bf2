//! Type-safe fronts for the channels that connect pipeline stages.

pub mod event_client;
pub mod order_queue;

pub use event_client::{EventClient, EventSink};
pub use order_queue::*;
