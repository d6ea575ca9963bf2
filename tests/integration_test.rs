use coffeeshop::clients::EventSink;
use coffeeshop::config::ShopConfig;
use coffeeshop::framework::mock::RecordingSink;
use coffeeshop::lifecycle::CoffeeShop;
use coffeeshop::model::{Customer, OrderPhase};
use coffeeshop::monitor::{Event, EventSystem};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const SHOP: &str = r#"
[coffee_shop]
number_of_baristas = 3
number_of_cashiers = 2
number_of_greeters = 2
cashier_queue_size = 3
order_queue_size = 4

[[coffee_shop.coffee_types]]
name = "Espresso"
beans_to_water_ratio = "0.12"
price = "2.80"
size_in_ounces = 2

[[coffee_shop.coffee_types]]
name = "Latte"
beans_to_water_ratio = "0.05"
price = "3.50"
size_in_ounces = 8

[[coffee_shop.grinders]]
tag = "grinder-a"
grams_per_second = 5

[[coffee_shop.grinders]]
tag = "grinder-b"
grams_per_second = 3

[[coffee_shop.brewers]]
tag = "brewer-a"
ounces_water_per_second = 2

[[coffee_shop.brewers]]
tag = "brewer-b"
ounces_water_per_second = 3

[simulation]
time_unit_ms = 1000
max_cashier_delay_units = 2
"#;

async fn serve(shop: &CoffeeShop, count: usize) -> Vec<Arc<Customer>> {
    let mut customers = Vec::new();
    for i in 0..count {
        let customer = Arc::new(Customer::new(format!("guest-{i}"), shop.catalog()));
        shop.serve_customer(customer.clone())
            .await
            .expect("Failed to serve customer");
        customers.push(customer);
    }
    customers
}

/// Full end-to-end run with every real stage and the real event sidecar.
#[tokio::test(start_paused = true)]
async fn test_full_pipeline_with_metrics() {
    let config = ShopConfig::from_toml(SHOP).expect("Invalid config");
    let events = EventSystem::start(8);
    let mut shop =
        CoffeeShop::new(&config, Arc::new(events.client())).expect("Failed to build shop");
    shop.open();

    let customers = serve(&shop, 15).await;
    shop.wait_for_orders().await;
    assert_eq!(shop.outstanding(), 0);

    events.stop().await.expect("Failed to stop events");
    let summary = events.summary().expect("Summary unavailable");
    assert_eq!(summary.received_orders, 15);
    assert_eq!(summary.processed_orders, 15);
    assert_eq!(summary.completed_orders, 15);
    let grind = summary.average_grind_time.expect("No grind average");
    let wait = summary.average_wait_time.expect("No wait average");
    assert!(grind > Duration::ZERO);
    assert!(wait >= grind + summary.average_brew_time.expect("No brew average"));

    for customer in &customers {
        let departed = customer.departed_at().expect("Customer never left");
        assert!(departed > customer.arrived_at());
    }

    shop.close().await.expect("Shop did not close cleanly");
}

/// Every order goes through every phase exactly once, grind before brew.
#[tokio::test(start_paused = true)]
async fn test_every_order_served_once() {
    let config = ShopConfig::from_toml(SHOP).expect("Invalid config");
    let sink = Arc::new(RecordingSink::new());
    let mut shop = CoffeeShop::new(&config, sink.clone()).expect("Failed to build shop");
    shop.open();

    serve(&shop, 20).await;
    shop.wait_for_orders().await;
    shop.close().await.expect("Shop did not close cleanly");

    let received = sink.received();
    let completed = sink.completed();
    assert_eq!(received.len(), 20);
    assert_eq!(sink.processed().len(), 20);
    assert_eq!(completed.len(), 20);
    assert_eq!(received.iter().collect::<HashSet<_>>(), completed.iter().collect::<HashSet<_>>());

    for event in sink.events() {
        let Event::OrderCompleted(order) = event else {
            continue;
        };
        let served = order.served_at().expect("Completed order without served time");
        assert_eq!(order.phase(), OrderPhase::Completed);
        assert!(served > order.ordered_at());
        assert_eq!(order.processing_time(), served - order.ordered_at());

        let coffee = order.coffee();
        let grind = coffee.grind_time().expect("Coffee never ground");
        let brew = coffee.brew_time().expect("Coffee never brewed");
        assert!(order.processing_time() >= grind + brew);
    }
}

/// A shop that never opened still closes cleanly.
#[tokio::test]
async fn test_unopened_shop_closes_cleanly() {
    let config = ShopConfig::from_toml(SHOP).expect("Invalid config");
    let sink: Arc<dyn EventSink> = Arc::new(RecordingSink::new());
    let shop = CoffeeShop::new(&config, sink).expect("Failed to build shop");
    let catalog = shop.catalog();
    shop.close().await.expect("Unopened shop did not close cleanly");

    assert_eq!(catalog.coffee_types().len(), 2);
}
