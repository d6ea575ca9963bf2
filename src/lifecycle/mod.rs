//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`CoffeeShop`] - builds every pool from configuration, opens and closes the pipeline
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod coffee_shop;
pub mod tracing;

pub use coffee_shop::*;
pub use self::tracing::*;
