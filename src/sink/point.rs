use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::device::{DeviceHandle, Reading};

pub const TAG_MANUFACTURER: &str = "manufacturer";
pub const TAG_MODEL: &str = "model";
pub const TAG_HOST: &str = "hostname";
pub const TAG_UDN: &str = "udn";

/// One exported measurement: a reading tagged with the identity of the
/// device it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPoint {
    pub measurement: String,

    pub tags: IndexMap<&'static str, String>,

    pub fields: IndexMap<&'static str, u32>,

    pub timestamp: DateTime<Utc>,
}

impl MeasurementPoint {
    pub fn from_reading(
        measurement: &str,
        device: &DeviceHandle,
        reading: &Reading,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let tags = IndexMap::from([
            (TAG_MANUFACTURER, device.manufacturer.clone()),
            (TAG_MODEL, device.model.clone()),
            (TAG_HOST, device.host.clone()),
            (TAG_UDN, device.udn.clone()),
        ]);

        Self {
            measurement: measurement.to_string(),
            tags,
            fields: reading.fields(),
            timestamp,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<u32> {
        self.fields.get(key).copied()
    }
}
