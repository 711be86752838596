//! Process configuration, read from environment variables.
//!
//! | variable              | default       | meaning                                  |
//! |-----------------------|---------------|------------------------------------------|
//! | `MODULITH_LOG_FORMAT` | `json`        | `json` or `pretty`                       |
//! | `MODULITH_SEED_ITEMS` | `Widget:9.99` | comma-separated `name:price` list to create at start-up |
//!
//! Log filtering itself is controlled by `RUST_LOG`.

use core::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use modulith_observability::{LogFormat, UnknownLogFormat};

pub const LOG_FORMAT_VAR: &str = "MODULITH_LOG_FORMAT";
pub const SEED_ITEMS_VAR: &str = "MODULITH_SEED_ITEMS";

const DEFAULT_SEED_ITEMS: &str = "Widget:9.99";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MODULITH_LOG_FORMAT: {0}")]
    LogFormat(#[from] UnknownLogFormat),

    #[error("MODULITH_SEED_ITEMS: invalid entry `{entry}`: {reason}")]
    SeedItem { entry: String, reason: String },
}

/// An item to create through the catalog at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedItem {
    pub name: String,
    pub price: Decimal,
}

impl FromStr for SeedItem {
    type Err = ConfigError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::SeedItem {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        // Split on the last ':' so names may contain colons.
        let (name, price) = entry
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected `name:price`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        let price = Decimal::from_str(price.trim()).map_err(|e| invalid(&e.to_string()))?;

        Ok(SeedItem {
            name: name.to_string(),
            price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_format: LogFormat,
    pub seed_items: Vec<SeedItem>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        let raw_items = lookup(SEED_ITEMS_VAR).unwrap_or_else(|| DEFAULT_SEED_ITEMS.to_string());
        let seed_items = raw_items
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(SeedItem::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            log_format,
            seed_items,
        })
    }
}
