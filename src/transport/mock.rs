use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::wire::{ALIVE_ENDPOINT, DATA_ENDPOINT, DEVICE_INFO_ENDPOINT};
use super::TelemetryTransport;
use crate::core::{ChannelBatch, DeviceConfig, Sample};
use crate::error::{TelemetryError, TelemetryResult};

/// Scripted in-memory acquisition server.
///
/// Data batches are served in the order they were queued; an empty queue
/// serves an empty mapping, like a server with nothing new to report.
pub struct MockTransport {
    alive: AtomicBool,
    data_failing: AtomicBool,
    batches: Mutex<VecDeque<ChannelBatch>>,
    device_info: Mutex<Option<DeviceConfig>>,
    device_info_failures: AtomicUsize,
    data_calls: AtomicU64,
    probe_calls: AtomicU64,
    device_info_calls: AtomicU64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            data_failing: AtomicBool::new(false),
            batches: Mutex::new(VecDeque::new()),
            device_info: Mutex::new(None),
            device_info_failures: AtomicUsize::new(0),
            data_calls: AtomicU64::new(0),
            probe_calls: AtomicU64::new(0),
            device_info_calls: AtomicU64::new(0),
        }
    }

    pub fn with_device_info(config: DeviceConfig) -> Self {
        let transport = Self::new();
        transport.set_device_info(Some(config));
        transport
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn set_data_failing(&self, failing: bool) {
        self.data_failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_device_info(&self, config: Option<DeviceConfig>) {
        *self
            .device_info
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
    }

    /// Make the next `count` device-info requests fail
    pub fn fail_device_info(&self, count: usize) {
        self.device_info_failures.store(count, Ordering::SeqCst);
    }

    pub fn push_batch(&self, batch: ChannelBatch) {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(batch);
    }

    /// Queue a single-channel batch
    pub fn push_samples(&self, channel: &str, samples: Vec<Sample>) {
        let mut batch = ChannelBatch::new();
        batch.insert(channel.to_string(), samples);
        self.push_batch(batch);
    }

    pub fn queued_batches(&self) -> usize {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn data_calls(&self) -> u64 {
        self.data_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> u64 {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn device_info_calls(&self) -> u64 {
        self.device_info_calls.load(Ordering::SeqCst)
    }

    fn unreachable(&self, endpoint: &str) -> TelemetryError {
        TelemetryError::transport(endpoint, "connection refused")
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryTransport for MockTransport {
    async fn fetch_data(&self) -> TelemetryResult<ChannelBatch> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        if !self.alive.load(Ordering::SeqCst) || self.data_failing.load(Ordering::SeqCst) {
            return Err(self.unreachable(DATA_ENDPOINT));
        }

        let next = self
            .batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        Ok(next.unwrap_or_default())
    }

    async fn probe_alive(&self) -> TelemetryResult<()> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(self.unreachable(ALIVE_ENDPOINT))
        }
    }

    async fn fetch_device_info(&self) -> TelemetryResult<DeviceConfig> {
        self.device_info_calls.fetch_add(1, Ordering::SeqCst);
        if !self.alive.load(Ordering::SeqCst) {
            return Err(self.unreachable(DEVICE_INFO_ENDPOINT));
        }

        let remaining = self.device_info_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.device_info_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(TelemetryError::Status {
                endpoint: DEVICE_INFO_ENDPOINT.to_string(),
                status: 503,
            });
        }

        self.device_info
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| TelemetryError::malformed(DEVICE_INFO_ENDPOINT, "no device configured"))
    }
}
