use std::future::Future;
use std::sync::Arc;

use humantime::format_duration;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::CollectionConfig;
use crate::device::DeviceRegistry;
use crate::scheduler::{DiscoverySession, SessionOutcome};
use crate::sink::MetricsSink;

/// Keeps exactly one discovery session running until shutdown.
///
/// A session that ends because re-discovery is due is replaced right away.
/// A failed discovery is retried after the configured cooldown. When the
/// shutdown future resolves the sink is closed and [`Supervisor::run`]
/// returns.
pub struct Supervisor {
    registry: Arc<dyn DeviceRegistry>,

    sink: Arc<dyn MetricsSink>,

    config: CollectionConfig,
}

impl Supervisor {
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

    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        loop {
            let session = DiscoverySession::new(
                self.registry.clone(),
                self.sink.clone(),
                self.config.clone(),
            );
            info!("starting device discovery");
            let mut handle = tokio::spawn(session.run());

            let outcome = tokio::select! {
                () = &mut shutdown => break,
                joined = &mut handle => joined.unwrap_or_else(|e| {
                    SessionOutcome::DiscoveryFailed(
                        anyhow::Error::new(e).context("discovery session aborted"),
                    )
                }),
            };

            if let SessionOutcome::DiscoveryFailed(e) = outcome {
                error!(
                    cooldown = %format_duration(self.config.discovery_cooldown),
                    "device discovery failed, retrying after cooldown: {e:#}"
                );

                tokio::select! {
                    () = &mut shutdown => break,
                    () = sleep(self.config.discovery_cooldown) => {}
                }
            }
        }

        info!("shutting down");
        self.sink.close().await;
    }
}
