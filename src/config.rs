//! # Configuration
//!
//! The shop is described by one TOML document: pool sizes, the coffee catalog and the
//! physical machines under `[coffee_shop]`, and simulation knobs under an optional
//! `[simulation]` table.
//!
//! ```toml
//! [coffee_shop]
//! number_of_baristas = 3
//! number_of_cashiers = 2
//! number_of_greeters = 2
//! cashier_queue_size = 5
//! order_queue_size = 10
//!
//! [[coffee_shop.coffee_types]]
//! name = "Latte"
//! beans_to_water_ratio = "0.05"
//! price = "3.50"
//! size_in_ounces = 8
//!
//! [[coffee_shop.grinders]]
//! tag = "grinder-a"
//! grams_per_second = 5
//!
//! [[coffee_shop.brewers]]
//! tag = "brewer-a"
//! ounces_water_per_second = 2
//! ```
//!
//! Decimals are written as strings so they reach `BigDecimal` without passing through
//! a float.

use crate::model::CoffeeSpec;
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors that abort start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// The whole configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    pub coffee_shop: CoffeeShopSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoffeeShopSettings {
    pub number_of_baristas: usize,
    pub number_of_cashiers: usize,
    pub number_of_greeters: usize,
    pub cashier_queue_size: usize,
    pub order_queue_size: usize,
    pub coffee_types: Vec<CoffeeSpec>,
    pub grinders: Vec<GrinderSettings>,
    pub brewers: Vec<BrewerSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrinderSettings {
    pub tag: String,
    pub grams_per_second: NonZeroU32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrewerSettings {
    pub tag: String,
    pub ounces_water_per_second: NonZeroU32,
}

/// Simulation knobs. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Wall-clock length of one simulated second.
    pub time_unit_ms: u64,
    pub max_cashier_delay_units: u32,
    pub max_arrival_delay_units: u32,
    pub customers: usize,
    pub event_buffer_size: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            time_unit_ms: 1000,
            max_cashier_delay_units: 4,
            max_arrival_delay_units: 4,
            customers: 20,
            event_buffer_size: 64,
        }
    }
}

impl SimulationSettings {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }
}

impl CoffeeShopSettings {
    pub fn coffee_types(&self) -> &[CoffeeSpec] {
        &self.coffee_types
    }

    pub fn grinder_settings(&self) -> &[GrinderSettings] {
        &self.grinders
    }

    pub fn brewer_settings(&self) -> &[BrewerSettings] {
        &self.brewers
    }
}

impl ShopConfig {
    /// Reads, parses and validates the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!(
            path = %path.display(),
            coffee_types = config.coffee_shop.coffee_types.len(),
            grinders = config.coffee_shop.grinders.len(),
            brewers = config.coffee_shop.brewers.len(),
            "Config loaded"
        );
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let shop = &self.coffee_shop;
        for (name, value) in [
            ("number_of_baristas", shop.number_of_baristas),
            ("number_of_cashiers", shop.number_of_cashiers),
            ("number_of_greeters", shop.number_of_greeters),
            ("cashier_queue_size", shop.cashier_queue_size),
            ("order_queue_size", shop.order_queue_size),
            ("simulation.event_buffer_size", self.simulation.event_buffer_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }

        if shop.coffee_types.is_empty() {
            return Err(ConfigError::Invalid("no coffee types configured".into()));
        }
        for coffee in &shop.coffee_types {
            if coffee.beans_to_water_ratio <= BigDecimal::zero() {
                return Err(ConfigError::Invalid(format!(
                    "{}: beans_to_water_ratio must be positive",
                    coffee.name
                )));
            }
            if coffee.price < BigDecimal::zero() {
                return Err(ConfigError::Invalid(format!("{}: price is negative", coffee.name)));
            }
            if coffee.size_in_ounces == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: size_in_ounces must be at least 1",
                    coffee.name
                )));
            }
        }

        if shop.grinders.is_empty() {
            return Err(ConfigError::Invalid("no grinders configured".into()));
        }
        if shop.brewers.is_empty() {
            return Err(ConfigError::Invalid("no brewers configured".into()));
        }
        unique_tags("grinder", shop.grinders.iter().map(|g| g.tag.as_str()))?;
        unique_tags("brewer", shop.brewers.iter().map(|b| b.tag.as_str()))?;
        Ok(())
    }
}

fn unique_tags<'a>(kind: &str, tags: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag) {
            return Err(ConfigError::Invalid(format!("duplicate {kind} tag {tag}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const SHOP: &str = r#"
[coffee_shop]
number_of_baristas = 3
number_of_cashiers = 2
number_of_greeters = 2
cashier_queue_size = 5
order_queue_size = 10

[[coffee_shop.coffee_types]]
name = "Latte"
beans_to_water_ratio = "0.05"
price = "3.50"
size_in_ounces = 8

[[coffee_shop.coffee_types]]
name = "Espresso"
beans_to_water_ratio = "0.12"
price = "2.80"
size_in_ounces = 2

[[coffee_shop.grinders]]
tag = "grinder-a"
grams_per_second = 5

[[coffee_shop.brewers]]
tag = "brewer-a"
ounces_water_per_second = 2

[[coffee_shop.brewers]]
tag = "brewer-b"
ounces_water_per_second = 3
"#;

    #[test]
    fn test_parses_full_document() {
        let config = ShopConfig::from_toml(SHOP).unwrap();
        let shop = &config.coffee_shop;

        assert_eq!(shop.number_of_baristas, 3);
        assert_eq!(shop.order_queue_size, 10);
        assert_eq!(shop.coffee_types().len(), 2);
        assert_eq!(
            shop.coffee_types()[0].beans_to_water_ratio,
            BigDecimal::from_str("0.05").unwrap()
        );
        assert_eq!(shop.coffee_types()[1].price, BigDecimal::from_str("2.80").unwrap());
        assert_eq!(shop.grinder_settings()[0].grams_per_second.get(), 5);
        assert_eq!(shop.brewer_settings()[1].tag, "brewer-b");
        assert_eq!(config.simulation, SimulationSettings::default());
        assert_eq!(config.simulation.time_unit(), Duration::from_secs(1));
    }

    #[test]
    fn test_simulation_fields_override_defaults() {
        let doc = format!("{SHOP}\n[simulation]\ntime_unit_ms = 10\ncustomers = 3\n");
        let config = ShopConfig::from_toml(&doc).unwrap();
        assert_eq!(config.simulation.time_unit(), Duration::from_millis(10));
        assert_eq!(config.simulation.customers, 3);
        assert_eq!(config.simulation.max_cashier_delay_units, 4);
    }

    #[test]
    fn test_zero_rate_is_a_parse_error() {
        let doc = SHOP.replace("grams_per_second = 5", "grams_per_second = 0");
        assert!(matches!(ShopConfig::from_toml(&doc), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_pool_size_is_rejected() {
        let doc = SHOP.replace("number_of_greeters = 2", "number_of_greeters = 0");
        let err = ShopConfig::from_toml(&doc).unwrap_err();
        assert!(err.to_string().contains("number_of_greeters"), "{err}");
    }

    #[test]
    fn test_duplicate_machine_tags_are_rejected() {
        let doc = SHOP.replace("tag = \"brewer-b\"", "tag = \"brewer-a\"");
        assert!(matches!(
            ShopConfig::from_toml(&doc),
            Err(ConfigError::Invalid(msg)) if msg.contains("brewer-a")
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        assert!(matches!(
            ShopConfig::load("/nonexistent/coffeeshop.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
