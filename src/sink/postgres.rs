use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use crate::config::PostgresConfig;
use crate::device::{
    FIELD_BYTE_RECEIVE_RATE, FIELD_BYTE_SEND_RATE, FIELD_PACKET_RECEIVE_RATE,
    FIELD_PACKET_SEND_RATE, FIELD_TOTAL_BYTES_RECEIVED, FIELD_TOTAL_BYTES_SENT,
};
use crate::sink::{
    Batch, MeasurementPoint, MetricsSink, TAG_HOST, TAG_MANUFACTURER, TAG_MODEL, TAG_UDN,
};

const INSERT_READINGS: &str = r#"
INSERT INTO gateway_readings (
    measured_at, measurement, hostname, udn, manufacturer, model,
    byte_send_rate, byte_receive_rate, packet_send_rate, packet_receive_rate,
    total_bytes_sent, total_bytes_received
)
SELECT * FROM UNNEST(
    $1::TIMESTAMPTZ[], $2::TEXT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::TEXT[],
    $7::INT8[], $8::INT8[], $9::INT8[], $10::INT8[], $11::INT8[], $12::INT8[]
)
ON CONFLICT (hostname, measured_at) DO NOTHING
"#;

/// Writes batches into the `gateway_readings` table.
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE gateway_readings (
///     measured_at          TIMESTAMPTZ NOT NULL,
///     measurement          TEXT        NOT NULL,
///     hostname             TEXT        NOT NULL,
///     udn                  TEXT        NOT NULL,
///     manufacturer         TEXT        NOT NULL,
///     model                TEXT        NOT NULL,
///     byte_send_rate       INT8,
///     byte_receive_rate    INT8,
///     packet_send_rate     INT8,
///     packet_receive_rate  INT8,
///     total_bytes_sent     INT8,
///     total_bytes_received INT8,
///     PRIMARY KEY (hostname, measured_at)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .connect(&config.url)
            .await
            .context("failed to connect to database")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MetricsSink for PostgresSink {
    async fn export(&self, batch: &Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let columns = ReadingColumns::from_points(batch.points());

        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query(INSERT_READINGS)
            .bind(&columns.measured_ats)
            .bind(&columns.measurements)
            .bind(&columns.hostnames)
            .bind(&columns.udns)
            .bind(&columns.manufacturers)
            .bind(&columns.models)
            .bind(&columns.byte_send_rates)
            .bind(&columns.byte_receive_rates)
            .bind(&columns.packet_send_rates)
            .bind(&columns.packet_receive_rates)
            .bind(&columns.total_bytes_sents)
            .bind(&columns.total_bytes_receiveds)
            .execute(&mut *tx)
            .await
            .context("failed to execute bulk insert query")?;

        tx.commit().await.context("failed to commit transaction")?;

        debug!(points = batch.len(), "batch written to database");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A batch pivoted into one array per table column.
#[derive(Debug, Default)]
struct ReadingColumns {
    measured_ats: Vec<DateTime<Utc>>,
    measurements: Vec<String>,
    hostnames: Vec<String>,
    udns: Vec<String>,
    manufacturers: Vec<String>,
    models: Vec<String>,
    byte_send_rates: Vec<Option<i64>>,
    byte_receive_rates: Vec<Option<i64>>,
    packet_send_rates: Vec<Option<i64>>,
    packet_receive_rates: Vec<Option<i64>>,
    total_bytes_sents: Vec<Option<i64>>,
    total_bytes_receiveds: Vec<Option<i64>>,
}

impl ReadingColumns {
    fn from_points(points: &[MeasurementPoint]) -> Self {
        let tag = |p: &MeasurementPoint, key: &str| p.tag(key).unwrap_or_default().to_string();
        let field = |p: &MeasurementPoint, key: &str| p.field(key).map(i64::from);

        let mut columns = Self::default();
        for p in points {
            columns.measured_ats.push(p.timestamp);
            columns.measurements.push(p.measurement.clone());
            columns.hostnames.push(tag(p, TAG_HOST));
            columns.udns.push(tag(p, TAG_UDN));
            columns.manufacturers.push(tag(p, TAG_MANUFACTURER));
            columns.models.push(tag(p, TAG_MODEL));
            columns.byte_send_rates.push(field(p, FIELD_BYTE_SEND_RATE));
            columns.byte_receive_rates.push(field(p, FIELD_BYTE_RECEIVE_RATE));
            columns.packet_send_rates.push(field(p, FIELD_PACKET_SEND_RATE));
            columns.packet_receive_rates.push(field(p, FIELD_PACKET_RECEIVE_RATE));
            columns.total_bytes_sents.push(field(p, FIELD_TOTAL_BYTES_SENT));
            columns.total_bytes_receiveds.push(field(p, FIELD_TOTAL_BYTES_RECEIVED));
        }

        columns
    }
}
