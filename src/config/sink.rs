use serde::{Deserialize, Serialize};

/// Where collected batches are exported to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    Influx(InfluxConfig),
    Postgres(PostgresConfig),
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Influx(InfluxConfig::default())
    }
}

/// InfluxDB 1.x connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    /// Address the InfluxDB instance is listening at.
    pub addr: String,

    /// Optional; basic auth is only used when set.
    pub username: String,

    pub password: String,

    /// Target database. It has to exist already.
    pub database: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            addr: "http://localhost:8086".to_string(),
            username: String::new(),
            password: String::new(),
            database: "fritzBox".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
}
