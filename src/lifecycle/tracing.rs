//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); every stage logs the
//! structured fields that identify it instead (`greeter`, `cashier`, `barista`,
//! `grinder`/`brewer` tag, `order`, `customer`).
//!
//! ## Levels
//!
//! - `info`: lifecycle of every loop, each customer and order moving between stages,
//!   the final metrics summary
//! - `debug`: machine submits and deliveries, pool leases, every event reaching the
//!   sidecar
//! - `error`: invariant violations, logged by the task that hit them
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Pool and machine detail
//! RUST_LOG=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**, one customer through the shop:
//!
//! ```text
//! INFO assign_customer: Greeter is greeting customer greeter=1 customer="7"
//! INFO assign_customer: Greeter assigned customer to cashier greeter=1 customer=7 cashier=2 queue_size=1
//! INFO Customer is placing order cashier=2 customer="7"
//! INFO Customer is done placing order cashier=2 customer="7" order=order_7 queue_size=1
//! INFO process_order: Barista is processing order barista=3 order=order_7 customer="7"
//! INFO process_order: Grinding barista=3 grinder="grinder-a" order=order_7
//! INFO Processing kind="grinder" tag=grinder-a order=order_7 coffee=Latte size=large quantity=14.18 units=2
//! INFO process_order: Brewing barista=3 brewer="brewer-b" order=order_7
//! INFO Processing kind="brewer" tag=brewer-b order=order_7 coffee=Latte size=large quantity=10.00 units=5
//! INFO process_order: Order completed order=order_7 customer=7 price=4.00
//! INFO process_order: Barista is done processing order customer="7" processing_time=11s
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Stages identify themselves through fields
        .compact()
        .init();
}
