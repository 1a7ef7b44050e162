use std::time::Duration;

use humantime::{FormattedDuration, format_duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(
        "discovery interval of {} is too low, use an interval of at least one minute",
        human(.0)
    )]
    DiscoveryIntervalTooLow(Duration),

    #[error(
        "collection interval of {} is too low, use an interval of at least one second",
        human(.0)
    )]
    IntervalTooLow(Duration),

    #[error(
        "collection interval is greater than the discovery interval ({} > {}), use a smaller collection interval",
        human(.interval),
        human(.discovery_interval)
    )]
    IntervalExceedsDiscovery {
        interval: Duration,
        discovery_interval: Duration,
    },

    #[error(
        "discovery cooldown of {} is too low, use a cooldown of at least one second",
        human(.0)
    )]
    CooldownTooLow(Duration),

    #[error(
        "discovery search window of {} is too low, use at least one second",
        human(.0)
    )]
    SearchWindowTooLow(Duration),

    #[error(
        "discovery request timeout of {} is too low, use at least one second",
        human(.0)
    )]
    RequestTimeoutTooLow(Duration),

    #[error("measurement name must not be empty")]
    EmptyMeasurement,

    #[error("invalid InfluxDB address: '{0}'")]
    InvalidInfluxAddress(String),

    #[error("InfluxDB database must not be empty")]
    EmptyDatabase,

    #[error("PostgreSQL url must not be empty")]
    EmptyPostgresUrl,
}

fn human(duration: &Duration) -> FormattedDuration {
    format_duration(*duration)
}
