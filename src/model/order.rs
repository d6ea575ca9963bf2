//! A customer order.
//!
//! An order moves `Placed → Processing → Completed`, each step exactly once. Completing
//! stamps the served instant and the customer's departure together.
use crate::error::ShopError;
use crate::model::{Coffee, CoffeeSize, CoffeeSpec, Customer, Extra};
use bigdecimal::BigDecimal;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderPhase {
    Placed = 0,
    Processing = 1,
    Completed = 2,
}

impl OrderPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Placed,
            1 => Self::Processing,
            _ => Self::Completed,
        }
    }
}

impl Display for OrderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Placed => "placed",
            Self::Processing => "processing",
            Self::Completed => "completed",
        })
    }
}

/// Price of a coffee: catalog price, plus 0.50 per size step, plus 0.25 per extra.
pub fn price_for(spec: &CoffeeSpec, size: CoffeeSize, extras: &[Extra]) -> BigDecimal {
    let size_surcharge = BigDecimal::new((50 * i64::from(size.ordinal())).into(), 2);
    let extras_count = i64::try_from(extras.len()).unwrap_or(i64::MAX);
    let extras_surcharge = BigDecimal::new((25 * extras_count).into(), 2);
    spec.price.clone() + size_surcharge + extras_surcharge
}

#[derive(Debug)]
pub struct Order {
    id: OrderId,
    customer: Arc<Customer>,
    coffee: Coffee,
    ordered_at: Instant,
    served_at: OnceLock<Instant>,
    price: BigDecimal,
    phase: AtomicU8,
}

impl Order {
    /// Creates a new Order instance in the `Placed` phase, stamped now.
    pub fn new(
        id: OrderId,
        customer: Arc<Customer>,
        spec: CoffeeSpec,
        size: CoffeeSize,
        extras: Vec<Extra>,
    ) -> Self {
        let price = price_for(&spec, size, &extras);
        Self {
            id,
            customer,
            coffee: Coffee::new(id, spec, size, extras),
            ordered_at: Instant::now(),
            served_at: OnceLock::new(),
            price,
            phase: AtomicU8::new(OrderPhase::Placed as u8),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &Arc<Customer> {
        &self.customer
    }

    pub fn coffee(&self) -> &Coffee {
        &self.coffee
    }

    pub fn price(&self) -> &BigDecimal {
        &self.price
    }

    pub fn ordered_at(&self) -> Instant {
        self.ordered_at
    }

    pub fn served_at(&self) -> Option<Instant> {
        self.served_at.get().copied()
    }

    pub fn phase(&self) -> OrderPhase {
        OrderPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// `served − ordered`, zero while the order is not served.
    pub fn processing_time(&self) -> Duration {
        self.served_at()
            .map(|served| served.duration_since(self.ordered_at))
            .unwrap_or_default()
    }

    /// A barista picked the order up.
    pub fn start_processing(&self) -> Result<(), ShopError> {
        self.transition(OrderPhase::Placed, OrderPhase::Processing)
    }

    /// Marks the order served and lets the customer leave.
    pub fn complete(&self) -> Result<(), ShopError> {
        self.transition(OrderPhase::Processing, OrderPhase::Completed)?;
        let now = Instant::now();
        // Only the caller that won the transition reaches this point.
        let _ = self.served_at.set(now);
        self.customer.depart(now)?;
        info!(
            order = %self.id,
            customer = %self.customer.name(),
            price = %self.price,
            "Order completed"
        );
        Ok(())
    }

    fn transition(&self, from: OrderPhase, to: OrderPhase) -> Result<(), ShopError> {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| ShopError::InvalidTransition {
                order: self.id,
                from: OrderPhase::from_u8(actual),
                to,
            })
    }
}
