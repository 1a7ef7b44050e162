use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_DISCOVERY_COOLDOWN: Duration = Duration::from_secs(30);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_SEARCH_WINDOW: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const MIN_DISCOVERY_INTERVAL: Duration = Duration::from_secs(60);
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);
pub const MIN_DISCOVERY_COOLDOWN: Duration = Duration::from_secs(1);
pub const MIN_SEARCH_WINDOW: Duration = Duration::from_secs(1);
pub const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Scheduling of discovery and collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Measurement name written with every point.
    pub measurement: String,

    /// Time after which the device set is dropped and discovery runs again.
    #[serde(with = "humantime_serde")]
    pub discovery_interval: Duration,

    /// Wait before retrying a discovery that failed.
    #[serde(with = "humantime_serde")]
    pub discovery_cooldown: Duration,

    /// Time between two collection ticks.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            measurement: "WANConnection".to_string(),
            discovery_interval: DEFAULT_DISCOVERY_INTERVAL,
            discovery_cooldown: DEFAULT_DISCOVERY_COOLDOWN,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Network discovery tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// How long SSDP responses are collected after a search is sent.
    #[serde(with = "humantime_serde")]
    pub search_window: Duration,

    /// Timeout for each HTTP request made to a device.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_window: DEFAULT_SEARCH_WINDOW,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
