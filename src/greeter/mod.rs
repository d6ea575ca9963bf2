//! Greeters: the front door. A greeter is leased from the pool per arriving
//! customer and walks them to the cashier with the shortest queue.

use crate::cashier_actor::CashierPool;
use crate::error::ShopError;
use crate::framework::ResourcePool;
use crate::model::Customer;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct Greeter {
    id: usize,
    cashiers: Arc<CashierPool>,
}

impl Greeter {
    pub fn new(id: usize, cashiers: Arc<CashierPool>) -> Self {
        Self { id, cashiers }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Hands `customer` to the least busy cashier.
    pub async fn greet(&self, customer: Arc<Customer>) -> Result<usize, ShopError> {
        let name = customer.name().to_string();
        let (cashier, queue_size) = self.cashiers.assign(customer).await?;
        info!(
            greeter = self.id,
            customer = %name,
            cashier,
            queue_size,
            "Greeter assigned customer to cashier"
        );
        Ok(cashier)
    }
}

/// Fixed set of greeters, one customer each at a time.
pub struct GreeterPool {
    greeters: ResourcePool<Greeter>,
}

impl GreeterPool {
    /// Creates `count` greeters with ids `1..=count`, all sharing `cashiers`.
    pub fn new(count: usize, cashiers: Arc<CashierPool>) -> Self {
        let greeters = (1..=count)
            .map(|id| Greeter::new(id, cashiers.clone()))
            .collect();
        info!(greeters = count, "Greeter pool created");
        Self {
            greeters: ResourcePool::new("greeter", greeters),
        }
    }

    /// Waits for a free greeter and lets them assign `customer`. Returns the cashier id.
    #[instrument(skip(self, customer), fields(customer = customer.name()))]
    pub async fn assign_customer(&self, customer: Arc<Customer>) -> Result<usize, ShopError> {
        let greeter = self.greeters.lease().await?;
        info!(greeter = greeter.id(), "Greeter is greeting customer");
        let assigned = greeter.greet(customer).await;
        self.greeters.release(greeter);
        assigned
    }

    /// Turns away every pending and future customer.
    pub fn close(&self) {
        self.greeters.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashier_actor;
    use crate::framework::mock;

    #[tokio::test]
    async fn test_concurrent_greeters_balance_cashier_queues() {
        let (_actors, cashiers) = cashier_actor::new(4, 32);
        let cashiers = Arc::new(cashiers);
        let greeters = Arc::new(GreeterPool::new(3, cashiers.clone()));

        let arrivals: Vec<_> = (0..40)
            .map(|i| {
                let greeters = greeters.clone();
                let customer = mock::customer(&format!("c{i}"));
                tokio::spawn(async move { greeters.assign_customer(customer).await })
            })
            .collect();
        for arrival in arrivals {
            arrival.await.unwrap().unwrap();
        }

        let lengths: Vec<usize> = cashiers
            .queue_lengths()
            .await
            .into_iter()
            .map(|(_, len)| len)
            .collect();
        assert_eq!(lengths.iter().sum::<usize>(), 40);
        let max = lengths.iter().max().unwrap();
        let min = lengths.iter().min().unwrap();
        assert!(max - min <= 1, "unbalanced queues {lengths:?}");
    }

    #[tokio::test]
    async fn test_closed_greeter_pool_turns_customers_away() {
        let (_actors, cashiers) = cashier_actor::new(1, 1);
        let greeters = GreeterPool::new(1, Arc::new(cashiers));
        greeters.close();
        assert_eq!(
            greeters.assign_customer(mock::customer("late")).await,
            Err(ShopError::PoolClosed { kind: "greeter" })
        );
    }
}
