//! Cashiers and the load-balanced pool greeters assign customers through.

pub mod entity;

pub use entity::*;

use crate::error::ShopError;
use crate::model::Customer;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Creates `count` cashier actors with ids `1..=count`, and the pool of their handles.
pub fn new(count: usize, queue_size: usize) -> (Vec<CashierActor>, CashierPool) {
    let (actors, cashiers): (Vec<_>, Vec<_>) = (1..=count)
        .map(|id| CashierActor::new(id, queue_size))
        .unzip();
    info!(cashiers = cashiers.len(), queue_size, "Cashier pool created");
    (actors, CashierPool::new(cashiers))
}

/// Shared collection of cashiers behind one lock.
///
/// Selection and enqueue happen in the same critical section, so two greeters can
/// never both see the same cashier as shortest and pile onto it.
pub struct CashierPool {
    cashiers: Mutex<Vec<Cashier>>,
}

impl CashierPool {
    pub fn new(cashiers: Vec<Cashier>) -> Self {
        Self {
            cashiers: Mutex::new(cashiers),
        }
    }

    /// Enqueues `customer` at the cashier with the shortest queue, ties to the lowest id.
    /// Returns the chosen cashier's id and its queue length after the enqueue.
    pub async fn assign(&self, customer: Arc<Customer>) -> Result<(usize, usize), ShopError> {
        let cashiers = self.cashiers.lock().await;
        let cashier = cashiers
            .iter()
            .min_by_key(|c| (c.queue_len(), c.id()))
            .ok_or(ShopError::PoolClosed { kind: "cashier" })?;
        cashier.serve_customer(customer).await?;
        Ok((cashier.id(), cashier.queue_len()))
    }

    pub async fn queue_lengths(&self) -> Vec<(usize, usize)> {
        self.cashiers
            .lock()
            .await
            .iter()
            .map(|c| (c.id(), c.queue_len()))
            .collect()
    }

    /// Drops every cashier handle so the cashier loops finish their queues and exit.
    pub async fn close(&self) {
        self.cashiers.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::OrderQueue;
    use crate::framework::{mock, Outstanding};
    use crate::model::{OrderId, OrderPhase};
    use std::sync::atomic::AtomicU64;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shortest_queue_wins_ties_to_lowest_id() {
        let (_actors, pool) = new(3, 10);

        let mut picks = Vec::new();
        for i in 0..7 {
            let (cashier, _) = pool.assign(mock::customer(&format!("c{i}"))).await.unwrap();
            picks.push(cashier);
        }

        assert_eq!(picks, [1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(pool.queue_lengths().await, [(1, 3), (2, 2), (3, 2)]);
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_customers() {
        let (_actors, pool) = new(1, 1);
        pool.close().await;
        assert!(matches!(
            pool.assign(mock::customer("late")).await,
            Err(ShopError::PoolClosed { kind: "cashier" })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cashier_publishes_orders_and_reports_them() {
        let (mut actors, pool) = new(1, 4);
        let orders = OrderQueue::new(8);
        let sink = Arc::new(mock::RecordingSink::new());
        let outstanding = Outstanding::new();
        let ctx = CashierContext {
            orders: orders.clone(),
            events: sink.clone(),
            outstanding: outstanding.clone(),
            next_order_id: Arc::new(AtomicU64::new(1)),
            time_unit: Duration::from_secs(1),
            max_delay_units: 4,
        };
        let task = tokio::spawn(actors.remove(0).run(ctx));

        outstanding.add(2);
        pool.assign(mock::customer("Ann")).await.unwrap();
        pool.assign(mock::customer("Bo")).await.unwrap();
        pool.close().await;
        task.await.unwrap();

        let subscription = orders.subscribe();
        let first = subscription.next().await.unwrap();
        let second = subscription.next().await.unwrap();
        assert_eq!((first.id(), second.id()), (OrderId(1), OrderId(2)));
        assert_eq!(first.customer().name(), "Ann");
        assert_eq!(second.phase(), OrderPhase::Placed);
        assert_eq!(sink.received(), [OrderId(1), OrderId(2)]);
        assert_eq!(outstanding.get(), 2);
    }
}
