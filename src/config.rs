//! Application configuration.
//!
//! Loaded from a YAML file; every key is optional and falls back to the
//! values of [`Configuration::default`]. Durations use humantime notation
//! (`10s`, `1h`, `1h30m`).

mod collection;
mod error;
mod sink;

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub use collection::*;
pub use error::*;
pub use sink::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub sink: SinkConfig,

    pub collection: CollectionConfig,

    pub discovery: DiscoveryConfig,
}

impl Configuration {
    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the bounds the scheduler relies on. The first violation found
    /// is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = &self.collection;

        if collection.measurement.is_empty() {
            return Err(ConfigError::EmptyMeasurement);
        }
        if collection.discovery_interval < MIN_DISCOVERY_INTERVAL {
            return Err(ConfigError::DiscoveryIntervalTooLow(
                collection.discovery_interval,
            ));
        }
        if collection.interval < MIN_INTERVAL {
            return Err(ConfigError::IntervalTooLow(collection.interval));
        }
        if collection.interval > collection.discovery_interval {
            return Err(ConfigError::IntervalExceedsDiscovery {
                interval: collection.interval,
                discovery_interval: collection.discovery_interval,
            });
        }
        if collection.discovery_cooldown < MIN_DISCOVERY_COOLDOWN {
            return Err(ConfigError::CooldownTooLow(collection.discovery_cooldown));
        }

        if self.discovery.search_window < MIN_SEARCH_WINDOW {
            return Err(ConfigError::SearchWindowTooLow(self.discovery.search_window));
        }
        if self.discovery.request_timeout < MIN_REQUEST_TIMEOUT {
            return Err(ConfigError::RequestTimeoutTooLow(
                self.discovery.request_timeout,
            ));
        }

        match &self.sink {
            SinkConfig::Influx(influx) => {
                let valid_addr = Url::parse(&influx.addr)
                    .map(|url| matches!(url.scheme(), "http" | "https"))
                    .unwrap_or(false);
                if !valid_addr {
                    return Err(ConfigError::InvalidInfluxAddress(influx.addr.clone()));
                }
                if influx.database.is_empty() {
                    return Err(ConfigError::EmptyDatabase);
                }
            }
            SinkConfig::Postgres(postgres) => {
                if postgres.url.is_empty() {
                    return Err(ConfigError::EmptyPostgresUrl);
                }
            }
        }

        Ok(())
    }
}
