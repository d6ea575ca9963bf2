//! [`Machine`] implementation for brewers.

use crate::config::BrewerSettings;
use crate::error::ShopError;
use crate::framework::Machine;
use crate::model::Order;
use bigdecimal::BigDecimal;
use std::num::NonZeroU32;
use std::time::Duration;

/// Runs the coffee's water through the grounds at `ounces_water_per_second`.
#[derive(Debug, Clone)]
pub struct Brewer {
    tag: String,
    ounces_water_per_second: NonZeroU32,
}

impl Brewer {
    pub fn new(tag: impl Into<String>, ounces_water_per_second: NonZeroU32) -> Self {
        Self {
            tag: tag.into(),
            ounces_water_per_second,
        }
    }
}

impl From<&BrewerSettings> for Brewer {
    fn from(settings: &BrewerSettings) -> Self {
        Self::new(settings.tag.clone(), settings.ounces_water_per_second)
    }
}

impl Machine for Brewer {
    const KIND: &'static str = "brewer";

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rate(&self) -> NonZeroU32 {
        self.ounces_water_per_second
    }

    fn quantity<'a>(&self, order: &'a Order) -> &'a BigDecimal {
        order.coffee().water_needed()
    }

    fn deliver(&self, order: &Order, elapsed: Duration) -> Result<(), ShopError> {
        order.coffee().record_brew(elapsed)
    }
}
