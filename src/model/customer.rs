use crate::error::ShopError;
use crate::model::{Catalog, Order, OrderId};
use rand::Rng;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;

/// A customer walking into the shop.
///
/// Arrival is stamped on construction; departure is stamped once, by the order's
/// completion.
#[derive(Debug)]
pub struct Customer {
    name: String,
    arrived_at: Instant,
    departed_at: OnceLock<Instant>,
    catalog: Arc<Catalog>,
}

impl Customer {
    pub fn new(name: impl Into<String>, catalog: Arc<Catalog>) -> Self {
        Self {
            name: name.into(),
            arrived_at: Instant::now(),
            departed_at: OnceLock::new(),
            catalog,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arrived_at(&self) -> Instant {
        self.arrived_at
    }

    pub fn departed_at(&self) -> Option<Instant> {
        self.departed_at.get().copied()
    }

    /// `departure − arrival`, zero until the customer leaves.
    pub fn wait_time(&self) -> Duration {
        self.departed_at()
            .map(|left| left.duration_since(self.arrived_at))
            .unwrap_or_default()
    }

    pub(crate) fn depart(&self, at: Instant) -> Result<(), ShopError> {
        self.departed_at
            .set(at)
            .map_err(|_| ShopError::AlreadyDeparted {
                customer: self.name.clone(),
            })
    }

    /// Picks something from the catalog and turns it into an order.
    pub fn place_order(
        self: &Arc<Self>,
        id: OrderId,
        rng: &mut impl Rng,
    ) -> Result<Arc<Order>, ShopError> {
        let choice = self.catalog.pick(rng)?;
        Ok(Arc::new(Order::new(
            id,
            self.clone(),
            choice.spec,
            choice.size,
            choice.extras,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoffeeSpec, OrderPhase};
    use bigdecimal::BigDecimal;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![CoffeeSpec {
                name: "Flat White".to_string(),
                beans_to_water_ratio: BigDecimal::from_str("0.07").unwrap(),
                price: BigDecimal::from_str("3.80").unwrap(),
                size_in_ounces: 6,
            }])
            .unwrap(),
        )
    }

    #[test]
    fn test_wait_time_is_zero_until_departure() {
        let customer = Customer::new("Dana", catalog());
        assert_eq!(customer.name(), "Dana");
        assert_eq!(customer.departed_at(), None);
        assert_eq!(customer.wait_time(), Duration::ZERO);
    }

    #[test]
    fn test_departure_is_set_once() {
        let customer = Customer::new("Eve", catalog());
        let now = Instant::now();
        customer.depart(now).unwrap();
        assert_eq!(
            customer.depart(now),
            Err(ShopError::AlreadyDeparted {
                customer: "Eve".to_string()
            })
        );
        assert_eq!(customer.departed_at(), Some(now));
    }

    #[test]
    fn test_placed_order_refers_back_to_customer() {
        let customer = Arc::new(Customer::new("Finn", catalog()));
        let mut rng = StdRng::seed_from_u64(7);
        let order = customer.place_order(OrderId(9), &mut rng).unwrap();

        assert_eq!(order.id(), OrderId(9));
        assert_eq!(order.phase(), OrderPhase::Placed);
        assert_eq!(order.customer().name(), "Finn");
        assert_eq!(order.coffee().spec().name, "Flat White");
    }
}
