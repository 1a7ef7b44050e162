use anyhow::Result;
use async_trait::async_trait;

use crate::device::{DeviceHandle, Reading};

/// Outcome of a discovery call that reached the network.
///
/// `errors` holds failures of individual candidates; they never abort the
/// discovery as a whole.
#[derive(Debug, Default)]
pub struct Discovery {
    pub devices: Vec<DeviceHandle>,

    pub errors: Vec<anyhow::Error>,
}

/// Finds gateways and reads their transfer counters.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Runs one discovery. An `Err` means discovery itself could not run.
    async fn discover(&self) -> Result<Discovery>;

    async fn fetch_reading(&self, device: &DeviceHandle) -> Result<Reading>;
}
