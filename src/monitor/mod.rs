//! Lifecycle events and the metrics sidecar that consumes them.

pub mod event;
pub mod event_system;
pub mod metrics;

pub use event::*;
pub use event_system::*;
pub use metrics::*;
