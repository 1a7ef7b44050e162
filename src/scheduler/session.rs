use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::CollectionConfig;
use crate::device::{DeviceHandle, DeviceRegistry};
use crate::scheduler::CollectionCycle;
use crate::sink::MetricsSink;

/// How a discovery session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The re-discovery deadline passed; start over right away.
    RediscoveryDue,

    /// Discovery could not run at all.
    DiscoveryFailed(anyhow::Error),
}

/// One discovery followed by collection over the devices it found.
pub struct DiscoverySession {
    registry: Arc<dyn DeviceRegistry>,
    sink: Arc<dyn MetricsSink>,
    config: CollectionConfig,
}

impl DiscoverySession {
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        sink: Arc<dyn MetricsSink>,
        config: CollectionConfig,
    ) -> Self {
        Self {
            registry,
            sink,
            config,
        }
    }

    pub async fn run(self) -> SessionOutcome {
        let discovery = match self.registry.discover().await {
            Ok(discovery) => discovery,
            Err(e) => return SessionOutcome::DiscoveryFailed(e),
        };

        for e in &discovery.errors {
            warn!("error during device discovery: {e:#}");
        }

        let devices = dedupe_devices(discovery.devices);
        info!(devices = devices.len(), "device discovery finished");

        CollectionCycle::new(devices, self.registry, self.sink, self.config)
            .run()
            .await
    }
}

/// Keeps the first device seen for each host, in discovery order.
pub fn dedupe_devices(candidates: Vec<DeviceHandle>) -> Vec<DeviceHandle> {
    let mut devices: IndexMap<String, DeviceHandle> = IndexMap::new();

    for candidate in candidates {
        if devices.contains_key(&candidate.host) {
            candidate
                .span()
                .in_scope(|| info!("ignoring duplicate device"));
            continue;
        }

        candidate.span().in_scope(|| info!("new device discovered"));
        devices.insert(candidate.host.clone(), candidate);
    }

    devices.into_values().collect()
}
