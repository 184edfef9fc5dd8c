use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{DeviceConfig, DeviceConfigCache};
use crate::error::TelemetryResult;
use crate::observability::PollMetrics;
use crate::resilience::{retry_with, RetryPolicy};
use crate::transport::TelemetryTransport;
use crate::visualization::SessionObserver;

/// Refreshes the device config cache and bootstraps the visualization
/// exactly once, on the first success.
pub struct ConfigPoller {
    transport: Arc<dyn TelemetryTransport>,
    cache: DeviceConfigCache,
    observer: Arc<dyn SessionObserver>,
    retry: RetryPolicy,
    bootstrapped: AtomicBool,
    metrics: Arc<PollMetrics>,
}

impl ConfigPoller {
    pub fn new(
        transport: Arc<dyn TelemetryTransport>,
        cache: DeviceConfigCache,
        observer: Arc<dyn SessionObserver>,
        retry: RetryPolicy,
        metrics: Arc<PollMetrics>,
    ) -> Self {
        Self {
            transport,
            cache,
            observer,
            retry,
            bootstrapped: AtomicBool::new(false),
            metrics,
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }

    async fn fetch(&self) -> TelemetryResult<DeviceConfig> {
        let start = self.metrics.start_request();
        let result = self.transport.fetch_device_info().await;
        self.metrics.finish_request(start);

        match &result {
            Ok(_) => self.metrics.record_success(),
            Err(_) => self.metrics.record_failure(),
        }
        result
    }

    /// Fetch the device config, retrying per policy, and publish it
    pub async fn poll_once(&self) -> TelemetryResult<Arc<DeviceConfig>> {
        let config = retry_with("Device info fetch", &self.retry, || self.fetch()).await?;

        let config = self.cache.replace(config);

        if !self.bootstrapped.swap(true, Ordering::SeqCst) {
            info!(
                "Device info received: {} channel(s), {} Hz",
                config.channel_count(),
                config.refresh_rate_hz
            );
            self.observer.on_config_ready(&config);
        }

        Ok(config)
    }
}
