//! Brewers: exclusive machines running water through the grounds.

pub mod entity;

pub use entity::*;

use crate::config::BrewerSettings;
use crate::framework::{MachineActor, MachineHandle, ResourcePool};
use std::time::Duration;
use tracing::info;

pub type BrewerHandle = MachineHandle<Brewer>;
pub type BrewerPool = ResourcePool<BrewerHandle>;

/// Creates a brewer actor and its handle.
pub fn new(
    settings: &BrewerSettings,
    time_unit: Duration,
) -> (MachineActor<Brewer>, BrewerHandle) {
    MachineActor::new(Brewer::from(settings), time_unit)
}

/// Creates one actor per configured brewer, and the pool leasing their handles.
pub fn pool(
    settings: &[BrewerSettings],
    time_unit: Duration,
) -> (Vec<MachineActor<Brewer>>, BrewerPool) {
    let (actors, handles): (Vec<_>, Vec<_>) = settings.iter().map(|s| new(s, time_unit)).unzip();
    info!(brewers = handles.len(), "Brewer pool created");
    (actors, ResourcePool::new("brewer", handles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock;
    use crate::model::{CoffeeSize, Order, OrderId};
    use std::num::NonZeroU32;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn settings(tag: &str, ounces_water_per_second: u32) -> BrewerSettings {
        BrewerSettings {
            tag: tag.to_string(),
            ounces_water_per_second: NonZeroU32::new(ounces_water_per_second).unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_brewing_records_time_and_fires_water_ready() {
        let (actor, handle) = new(&settings("brewer-a", 3), Duration::from_secs(1));
        let task = tokio::spawn(actor.run());

        // Extra-large latte: 12.00 oz at 3 oz/s -> 4 s
        let order = Arc::new(Order::new(
            OrderId(5),
            mock::customer("Ben"),
            mock::latte(),
            CoffeeSize::ExtraLarge,
            vec![],
        ));
        let started = Instant::now();
        handle.submit(order.clone()).await.unwrap();
        order.coffee().water_ready().await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(4));
        assert_eq!(order.coffee().brew_time(), Some(Duration::from_secs(4)));
        assert_eq!(order.coffee().grind_time(), None);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_brewer_takes_next_order_once_idle() {
        let (actor, handle) = new(&settings("brewer-b", 8), Duration::from_millis(100));
        let task = tokio::spawn(actor.run());

        for id in 1..=3 {
            let order = mock::order(id);
            handle.submit(order.clone()).await.unwrap();
            order.coffee().water_ready().await.unwrap();
            // 8.00 oz at 8 oz/s -> one unit
            assert_eq!(order.coffee().brew_time(), Some(Duration::from_millis(100)));
        }

        drop(handle);
        task.await.unwrap();
    }
}
