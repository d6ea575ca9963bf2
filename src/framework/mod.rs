//! Generic concurrency building blocks for the shop pipeline.
//!
//! Nothing in here knows about coffee beyond the [`Order`](crate::model::Order) a
//! machine works on; the concrete grinders, brewers and staff are built on top.
//!
//! # Main Components
//!
//! - [`Machine`] / [`MachineActor`] / [`MachineHandle`] - one exclusive physical unit and its processing loop
//! - [`ResourcePool`] - fixed set of exclusive resources, leased one at a time
//! - [`ReadySignal`] - single-use readiness rendezvous between a machine and a barista
//! - [`Outstanding`] - count of accepted-but-unfinished orders with an idle wait
//! - [`Worker`] - what a worker pool drives
//!
//! # Testing
//!
//! See [`mock`] module for a recording event sink and a scripted worker.

pub mod core;
pub mod counter;
pub mod mock;
pub mod pool;
pub mod signal;
pub mod worker;

pub use self::core::*;
pub use counter::*;
pub use pool::*;
pub use signal::*;
pub use worker::*;
