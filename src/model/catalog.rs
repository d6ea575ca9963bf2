//! The coffee catalog and the randomized order generator drawing from it.

use crate::error::ShopError;
use crate::model::{CoffeeSize, CoffeeSpec, Extra};
use rand::seq::SliceRandom;
use rand::Rng;

/// Extras a customer may ask for, one combination per order.
const EXTRA_OPTIONS: [&[Extra]; 4] = [
    &[],
    &[Extra::Milk],
    &[Extra::Sugar],
    &[Extra::Milk, Extra::Sugar],
];

/// What a customer decided to order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderChoice {
    pub spec: CoffeeSpec,
    pub size: CoffeeSize,
    pub extras: Vec<Extra>,
}

/// Coffee types on offer, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct Catalog {
    coffee_types: Vec<CoffeeSpec>,
}

impl Catalog {
    pub fn new(coffee_types: Vec<CoffeeSpec>) -> Result<Self, ShopError> {
        if coffee_types.is_empty() {
            return Err(ShopError::EmptyCatalog);
        }
        Ok(Self { coffee_types })
    }

    pub fn coffee_types(&self) -> &[CoffeeSpec] {
        &self.coffee_types
    }

    /// Picks a coffee type, size and extras uniformly at random.
    pub fn pick(&self, rng: &mut impl Rng) -> Result<OrderChoice, ShopError> {
        let spec = self
            .coffee_types
            .choose(rng)
            .ok_or(ShopError::EmptyCatalog)?
            .clone();
        let size = CoffeeSize::ALL[rng.gen_range(0..CoffeeSize::ALL.len())];
        let extras = EXTRA_OPTIONS[rng.gen_range(0..EXTRA_OPTIONS.len())].to_vec();
        Ok(OrderChoice { spec, size, extras })
    }
}
