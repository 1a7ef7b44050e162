use reqwest::Url;
use tracing::{Span, info_span};

/// A gateway found during discovery.
///
/// `host` is the de-duplication key. `control_url` is where the registry
/// sends reading requests for this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    pub host: String,

    pub manufacturer: String,

    pub model: String,

    pub udn: String,

    pub control_url: Url,
}

impl DeviceHandle {
    /// Logging context identifying this device.
    pub fn span(&self) -> Span {
        info_span!(
            "device",
            host = %self.host,
            udn = %self.udn,
            manufacturer = %self.manufacturer,
            model = %self.model,
        )
    }
}
