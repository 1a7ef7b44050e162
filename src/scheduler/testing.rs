use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use tokio::time::{Instant, sleep};

use crate::config::CollectionConfig;
use crate::device::{DeviceHandle, DeviceRegistry, Discovery, Reading};
use crate::sink::{Batch, MetricsSink};

pub fn device(host: &str) -> DeviceHandle {
    DeviceHandle {
        host: host.to_string(),
        manufacturer: "AVM Berlin".to_string(),
        model: "FRITZ!Box 7590".to_string(),
        udn: format!("uuid:{host}"),
        control_url: format!("http://{host}:49000/igdupnp/control/WANCommonIFC1")
            .parse()
            .unwrap(),
    }
}

pub fn collection_config(interval: Duration, discovery_interval: Duration) -> CollectionConfig {
    CollectionConfig {
        interval,
        discovery_interval,
        ..CollectionConfig::default()
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    devices: Vec<DeviceHandle>,

    partial_errors: Vec<&'static str>,

    failing_hosts: HashSet<String>,

    failing_discoveries: AtomicUsize,

    discoveries: Mutex<Vec<Instant>>,

    fetches: AtomicUsize,
}

impl FakeRegistry {
    pub fn new(devices: Vec<DeviceHandle>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    /// Fails the next `count` discoveries.
    pub fn failing_discoveries(self, count: usize) -> Self {
        self.failing_discoveries.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_partial_errors(mut self, errors: Vec<&'static str>) -> Self {
        self.partial_errors = errors;
        self
    }

    pub fn failing_host(mut self, host: &str) -> Self {
        self.failing_hosts.insert(host.to_string());
        self
    }

    pub fn discoveries(&self) -> Vec<Instant> {
        self.discoveries.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceRegistry for FakeRegistry {
    async fn discover(&self) -> Result<Discovery> {
        self.discoveries.lock().unwrap().push(Instant::now());

        let failing = self.failing_discoveries.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_discoveries.store(failing - 1, Ordering::SeqCst);
            bail!("network unreachable");
        }

        Ok(Discovery {
            devices: self.devices.clone(),
            errors: self.partial_errors.iter().map(|e| anyhow!(*e)).collect(),
        })
    }

    async fn fetch_reading(&self, device: &DeviceHandle) -> Result<Reading> {
        let count = self.fetches.fetch_add(1, Ordering::SeqCst) as u32;

        if self.failing_hosts.contains(&device.host) {
            bail!("connection refused");
        }

        Ok(Reading {
            byte_send_rate: count,
            byte_receive_rate: count * 2,
            ..Reading::default()
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<(Instant, Batch)>>,

    failing_exports: HashSet<usize>,

    export_delay: Duration,

    closed: AtomicBool,
}

impl RecordingSink {
    /// Fails the export of the batches at the given positions.
    pub fn failing_exports(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.failing_exports.extend(positions);
        self
    }

    pub fn export_delay(mut self, delay: Duration) -> Self {
        self.export_delay = delay;
        self
    }

    pub fn batches(&self) -> Vec<(Instant, Batch)> {
        self.batches.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn export(&self, batch: &Batch) -> Result<()> {
        let position = {
            let mut batches = self.batches.lock().unwrap();
            batches.push((Instant::now(), batch.clone()));
            batches.len() - 1
        };

        sleep(self.export_delay).await;

        if self.failing_exports.contains(&position) {
            bail!("sink unavailable");
        }
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
