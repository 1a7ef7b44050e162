use std::sync::Arc;

use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{Instrument, debug, error, info};

use crate::config::CollectionConfig;
use crate::device::{DeviceHandle, DeviceRegistry};
use crate::scheduler::SessionOutcome;
use crate::sink::{Batch, MeasurementPoint, MetricsSink};

/// Periodic collection over a fixed set of devices.
///
/// Ticks fire every `interval`, starting immediately. Each tick reads every
/// device in order and exports the result as one batch. After
/// `discovery_interval` the cycle ends with [`SessionOutcome::RediscoveryDue`];
/// a tick that is already running is finished first. Both durations must be
/// non-zero.
pub struct CollectionCycle {
    devices: Vec<DeviceHandle>,

    registry: Arc<dyn DeviceRegistry>,

    sink: Arc<dyn MetricsSink>,

    config: CollectionConfig,
}

impl CollectionCycle {
    pub fn new(
        devices: Vec<DeviceHandle>,
        registry: Arc<dyn DeviceRegistry>,
        sink: Arc<dyn MetricsSink>,
        config: CollectionConfig,
    ) -> Self {
        Self {
            devices,
            registry,
            sink,
            config,
        }
    }

    pub async fn run(self) -> SessionOutcome {
        let deadline = sleep(self.config.discovery_interval);
        tokio::pin!(deadline);

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                () = &mut deadline => {
                    info!("re-discovery due");
                    return SessionOutcome::RediscoveryDue;
                }
                _ = ticker.tick() => self.tick().await,
            }
        }
    }

    async fn tick(&self) {
        let batch = self.collect_batch().await;

        match self.sink.export(&batch).await {
            Ok(()) => info!(points = batch.len(), "exported batch"),
            Err(e) => error!(points = batch.len(), "failed to export batch: {e:#}"),
        }
    }

    /// Reads every device once. Devices that fail are left out of the batch.
    pub async fn collect_batch(&self) -> Batch {
        let mut batch = Batch::new();

        for device in &self.devices {
            let span = device.span();

            match self
                .registry
                .fetch_reading(device)
                .instrument(span.clone())
                .await
            {
                Ok(reading) => {
                    span.in_scope(|| debug!(%reading, "received reading"));
                    batch.push(MeasurementPoint::from_reading(
                        &self.config.measurement,
                        device,
                        &reading,
                        Utc::now(),
                    ));
                }
                Err(e) => span.in_scope(|| error!("failed to fetch reading: {e:#}")),
            }
        }

        batch
    }
}
