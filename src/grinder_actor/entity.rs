//! [`Machine`] implementation for grinders.
//!
//! A grinder works through the coffee's beans at `grams_per_second` and hands the
//! result back by recording the grind time, which fires beans-ready.

use crate::config::GrinderSettings;
use crate::error::ShopError;
use crate::framework::Machine;
use crate::model::Order;
use bigdecimal::BigDecimal;
use std::num::NonZeroU32;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Grinder {
    tag: String,
    grams_per_second: NonZeroU32,
}

impl Grinder {
    pub fn new(tag: impl Into<String>, grams_per_second: NonZeroU32) -> Self {
        Self {
            tag: tag.into(),
            grams_per_second,
        }
    }
}

impl From<&GrinderSettings> for Grinder {
    fn from(settings: &GrinderSettings) -> Self {
        Self::new(settings.tag.clone(), settings.grams_per_second)
    }
}

impl Machine for Grinder {
    const KIND: &'static str = "grinder";

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rate(&self) -> NonZeroU32 {
        self.grams_per_second
    }

    fn quantity<'a>(&self, order: &'a Order) -> &'a BigDecimal {
        order.coffee().beans_needed()
    }

    fn deliver(&self, order: &Order, elapsed: Duration) -> Result<(), ShopError> {
        order.coffee().record_grind(elapsed)
    }
}
