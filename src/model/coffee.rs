//! A coffee made for one order.
//!
//! Quantities are derived once from the catalog entry and the size, using two-place
//! decimal arithmetic. The coffee is touched by exactly one grinder (beans) and one
//! brewer (water); each records its elapsed time and fires the matching one-shot
//! readiness signal.
use crate::error::ShopError;
use crate::framework::ReadySignal;
use crate::model::OrderId;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::Deserialize;
use std::fmt::{self, Display};
use std::sync::OnceLock;
use std::time::Duration;

/// Catalog entry describing a kind of coffee.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoffeeSpec {
    pub name: String,
    pub beans_to_water_ratio: BigDecimal,
    pub price: BigDecimal,
    pub size_in_ounces: u32,
}

/// Cup size. Each step up adds a quarter of the base volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoffeeSize {
    Standard,
    Large,
    ExtraLarge,
}

impl CoffeeSize {
    pub const ALL: [CoffeeSize; 3] = [Self::Standard, Self::Large, Self::ExtraLarge];

    pub fn ordinal(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Large => 1,
            Self::ExtraLarge => 2,
        }
    }

    /// Volume multiplier: 1.00, 1.25, 1.50.
    pub fn multiplier(self) -> BigDecimal {
        BigDecimal::new((100 + 25 * i64::from(self.ordinal())).into(), 2)
    }
}

impl Display for CoffeeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
        })
    }
}

/// Optional add-ons. Each one adds a surcharge to the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extra {
    Milk,
    Sugar,
}

impl Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Milk => "milk",
            Self::Sugar => "sugar",
        })
    }
}

/// Grams per fluid ounce, held at two decimal places.
fn grams_per_ounce() -> BigDecimal {
    BigDecimal::new(2835i64.into(), 2)
}

fn round2(value: BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Ounces of water for `spec` at `size`.
pub fn water_needed(spec: &CoffeeSpec, size: CoffeeSize) -> BigDecimal {
    round2(size.multiplier() * BigDecimal::from(i64::from(spec.size_in_ounces)))
}

/// Grams of beans for `spec` at `size`.
pub fn beans_needed(spec: &CoffeeSpec, size: CoffeeSize) -> BigDecimal {
    round2(spec.beans_to_water_ratio.clone() * water_needed(spec, size) * grams_per_ounce())
}

#[derive(Debug)]
pub struct Coffee {
    order: OrderId,
    spec: CoffeeSpec,
    size: CoffeeSize,
    extras: Vec<Extra>,
    beans_needed: BigDecimal,
    water_needed: BigDecimal,
    beans_ready: ReadySignal,
    water_ready: ReadySignal,
    grind_time: OnceLock<Duration>,
    brew_time: OnceLock<Duration>,
}

impl Coffee {
    pub fn new(order: OrderId, spec: CoffeeSpec, size: CoffeeSize, extras: Vec<Extra>) -> Self {
        Self {
            order,
            beans_needed: beans_needed(&spec, size),
            water_needed: water_needed(&spec, size),
            spec,
            size,
            extras,
            beans_ready: ReadySignal::new("beans-ready"),
            water_ready: ReadySignal::new("water-ready"),
            grind_time: OnceLock::new(),
            brew_time: OnceLock::new(),
        }
    }

    pub fn spec(&self) -> &CoffeeSpec {
        &self.spec
    }

    pub fn size(&self) -> CoffeeSize {
        self.size
    }

    pub fn extras(&self) -> &[Extra] {
        &self.extras
    }

    pub fn beans_needed(&self) -> &BigDecimal {
        &self.beans_needed
    }

    pub fn water_needed(&self) -> &BigDecimal {
        &self.water_needed
    }

    pub fn grind_time(&self) -> Option<Duration> {
        self.grind_time.get().copied()
    }

    pub fn brew_time(&self) -> Option<Duration> {
        self.brew_time.get().copied()
    }

    /// Called by the grinder once the beans are ground.
    pub fn record_grind(&self, elapsed: Duration) -> Result<(), ShopError> {
        self.record(&self.grind_time, "grind", &self.beans_ready, elapsed)
    }

    /// Called by the brewer once the water has run through.
    pub fn record_brew(&self, elapsed: Duration) -> Result<(), ShopError> {
        self.record(&self.brew_time, "brew", &self.water_ready, elapsed)
    }

    pub async fn beans_ready(&self) -> Result<(), ShopError> {
        self.beans_ready.wait().await.map_err(|source| ShopError::Signal {
            order: self.order,
            source,
        })
    }

    pub async fn water_ready(&self) -> Result<(), ShopError> {
        self.water_ready.wait().await.map_err(|source| ShopError::Signal {
            order: self.order,
            source,
        })
    }

    fn record(
        &self,
        slot: &OnceLock<Duration>,
        field: &'static str,
        signal: &ReadySignal,
        elapsed: Duration,
    ) -> Result<(), ShopError> {
        slot.set(elapsed).map_err(|_| ShopError::DurationAlreadySet {
            order: self.order,
            field,
        })?;
        signal.fire(()).map_err(|source| ShopError::Signal {
            order: self.order,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::SignalError;
    use std::str::FromStr;

    fn latte() -> CoffeeSpec {
        CoffeeSpec {
            name: "Latte".to_string(),
            beans_to_water_ratio: BigDecimal::from_str("0.05").unwrap(),
            price: BigDecimal::from_str("3.50").unwrap(),
            size_in_ounces: 8,
        }
    }

    #[test]
    fn test_quantities_for_large() {
        let spec = latte();
        assert_eq!(
            water_needed(&spec, CoffeeSize::Large),
            BigDecimal::from_str("10.00").unwrap()
        );
        assert_eq!(
            beans_needed(&spec, CoffeeSize::Large),
            BigDecimal::from_str("14.18").unwrap()
        );
    }

    #[test]
    fn test_quantities_scale_with_size() {
        let spec = latte();
        let water: Vec<_> = CoffeeSize::ALL
            .iter()
            .map(|size| water_needed(&spec, *size))
            .collect();
        assert_eq!(
            water,
            ["8.00", "10.00", "12.00"]
                .iter()
                .map(|s| BigDecimal::from_str(s).unwrap())
                .collect::<Vec<_>>()
        );
        // 0.05 * 12 * 28.35 = 17.01
        assert_eq!(
            beans_needed(&spec, CoffeeSize::ExtraLarge),
            BigDecimal::from_str("17.01").unwrap()
        );
    }

    #[test]
    fn test_coffee_caches_quantities() {
        let coffee = Coffee::new(OrderId(1), latte(), CoffeeSize::Standard, vec![Extra::Milk]);
        assert_eq!(coffee.water_needed(), &BigDecimal::from_str("8").unwrap());
        // 0.05 * 8 * 28.35 = 11.34
        assert_eq!(coffee.beans_needed(), &BigDecimal::from_str("11.34").unwrap());
        assert_eq!(coffee.extras(), &[Extra::Milk]);
        assert_eq!(coffee.grind_time(), None);
    }

    #[tokio::test]
    async fn test_grind_is_recorded_once() {
        let coffee = Coffee::new(OrderId(4), latte(), CoffeeSize::Large, vec![]);
        coffee.record_grind(Duration::from_secs(2)).unwrap();
        coffee.beans_ready().await.unwrap();
        assert_eq!(coffee.grind_time(), Some(Duration::from_secs(2)));

        assert_eq!(
            coffee.record_grind(Duration::from_secs(3)),
            Err(ShopError::DurationAlreadySet {
                order: OrderId(4),
                field: "grind"
            })
        );
        assert_eq!(
            coffee.beans_ready().await,
            Err(ShopError::Signal {
                order: OrderId(4),
                source: SignalError::AlreadyConsumed("beans-ready")
            })
        );
        assert_eq!(coffee.grind_time(), Some(Duration::from_secs(2)));
    }
}
