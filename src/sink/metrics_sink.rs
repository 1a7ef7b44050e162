use anyhow::Result;
use async_trait::async_trait;

use crate::sink::Batch;

/// Destination for collected batches.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn export(&self, batch: &Batch) -> Result<()>;

    /// Releases the underlying connection. Called once on shutdown.
    async fn close(&self);
}
