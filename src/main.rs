//! # Coffee Shop Simulator
//!
//! Runs one simulated day: loads the shop from a TOML file, serves a stream of
//! customers arriving at random intervals, waits for every order, then logs the
//! metrics summary.
//!
//! ```bash
//! RUST_LOG=info cargo run -- --config coffeeshop.toml --customers 20
//! ```

use clap::Parser;
use coffeeshop::config::ShopConfig;
use coffeeshop::lifecycle::{setup_tracing, CoffeeShop};
use coffeeshop::model::Customer;
use coffeeshop::monitor::EventSystem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[derive(Parser)]
#[command(name = "coffeeshop", version, about = "Coffee shop pipeline simulator")]
struct Cli {
    /// Shop configuration file
    #[arg(long, default_value = "coffeeshop.toml")]
    config: PathBuf,

    /// Number of customers to serve, overriding the config
    #[arg(long)]
    customers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting coffee shop");

    let mut config = match ShopConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Cannot start without a valid config");
            return Err(e.to_string());
        }
    };
    if let Some(customers) = cli.customers {
        config.simulation.customers = customers;
    }
    let simulation = config.simulation.clone();

    // Event sidecar first so nothing the shop reports is lost
    let events = EventSystem::start(simulation.event_buffer_size);
    let mut shop = CoffeeShop::new(&config, Arc::new(events.client())).map_err(|e| e.to_string())?;
    shop.open();

    let mut rng = StdRng::from_entropy();
    for i in 0..simulation.customers {
        let customer = Arc::new(Customer::new(i.to_string(), shop.catalog()));
        let span = tracing::info_span!("arrival", customer = i);
        if let Err(e) = shop.serve_customer(customer).instrument(span).await {
            error!(customer = i, error = %e, "Customer turned away");
        }

        let gap = rng.gen_range(0..=simulation.max_arrival_delay_units);
        tokio::time::sleep(simulation.time_unit().saturating_mul(gap)).await;
    }

    shop.wait_for_orders().await;

    events.stop().await.map_err(|e| e.to_string())?;
    events.print_summary().map_err(|e| e.to_string())?;

    shop.close().await?;

    info!("Coffee shop closed");
    Ok(())
}
