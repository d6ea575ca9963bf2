//! # Coffee Shop
//!
//! > **A concurrent service pipeline, simulated as a coffee shop.**
//!
//! Customers are greeted, queued to the least busy cashier, and have their orders
//! published onto a shared order queue. A pool of baristas drains that queue, leasing
//! an exclusive grinder and then an exclusive brewer for every order. A metrics sidecar
//! observes each order as it is received, picked up and completed.
//!
//! ## 🏗️ Design Philosophy
//!
//! Every physical thing in the shop that can only do one job at a time (grinder,
//! brewer, greeter) is a resource in a fixed-size pool, leased one at a time. Every
//! stage that works through a stream (cashier, barista, machine, event sidecar) is a
//! loop in its own Tokio task, fed through a bounded channel:
//!
//! ```text
//! Customer → Greeter → Cashier → Order Queue → Barista (grind → brew) → done
//!                                                  │
//!                                                  └──► Event Sidecar (metrics)
//! ```
//!
//! Bounded channels give backpressure at every hop: a full order queue stalls the
//! cashiers, busy cashiers stall the greeters. Nothing is dropped and nothing times out.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: one loop for every machine
//! Grinders and brewers differ only in which quantity they consume and which readiness
//! signal they fire. [`Machine`](framework::Machine) captures that difference, and
//! [`MachineActor<M>`](framework::MachineActor) is the processing loop written once.
//!
//! ### One-shot signals
//! A barista waits for a machine through a [`ReadySignal`](framework::ReadySignal) on
//! the coffee. Firing twice or waiting twice is an error, never a stale value.
//!
//! ### Mocking
//! Stages are tested in isolation with [`RecordingSink`](framework::mock::RecordingSink)
//! and [`MockWorker`](framework::mock::MockWorker). See the [`framework::mock`] module.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Runtime failures are [`ShopError`](error::ShopError) variants carrying the order id or
//! machine tag involved. Configuration failures are [`ConfigError`](config::ConfigError)
//! and abort start-up.
//!
//! ### 2. Async Context Injection
//! Cashier loops receive their collaborators (order queue, event sink, id counter) at
//! `run()`, not at construction, so the orchestrator can build every pool before
//! starting any loop.
//!
//! ### 3. Observability
//! `tracing` everywhere with structured fields. See the [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic machine loop, resource pool, readiness signal, outstanding-work counter and
//! the [`Worker`](framework::Worker) trait.
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`CoffeeShop`](lifecycle::CoffeeShop) sizes every pool from [`config`], wires the
//! stages, opens and closes the pipeline.
//!
//! ### 3. The Interface ([`clients`])
//! [`OrderQueue`](clients::OrderQueue) and [`EventClient`](clients::EventClient): typed
//! fronts for the channels between stages.
//!
//! ### 4. The Stages ([`greeter`], [`cashier_actor`], [`barista_actor`], [`grinder_actor`], [`brewer_actor`])
//! The concrete shop built from the framework.
//!
//! ### 5. The Sidecar ([`monitor`])
//! Lifecycle [`Event`](monitor::Event)s folded into [`Metrics`](monitor::Metrics) by the
//! [`EventSystem`](monitor::EventSystem).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run with info logs
//! RUST_LOG=info cargo run -- --config coffeeshop.toml
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod barista_actor;
pub mod brewer_actor;
pub mod cashier_actor;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod greeter;
pub mod grinder_actor;
pub mod lifecycle;
pub mod model;
pub mod monitor;
