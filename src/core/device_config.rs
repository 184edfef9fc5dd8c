use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use super::ChannelId;

/// Per-channel acquisition descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: ChannelId,
    pub virtual_channel_count: u32,
    pub voltage_range: f64,
}

/// Device descriptor as last reported by the acquisition server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_label: String,
    pub channels: Vec<ChannelDescriptor>,
    pub refresh_rate_hz: f64,
}

/// Values shown in the device information panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device_label: String,
    pub channel_count: usize,
    pub virtual_channel_count: u32,
    pub refresh_rate_hz: f64,
    pub voltage_range: Option<f64>,
}

impl DeviceConfig {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Sum of virtual channels across all physical channels
    pub fn virtual_channel_count(&self) -> u32 {
        self.channels.iter().map(|c| c.virtual_channel_count).sum()
    }

    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.channels.iter().map(|c| c.id.clone()).collect()
    }

    pub fn summary(&self) -> DeviceSummary {
        DeviceSummary {
            device_label: format!("PicoScope {}", self.device_label),
            channel_count: self.channel_count(),
            virtual_channel_count: self.virtual_channel_count(),
            refresh_rate_hz: self.refresh_rate_hz,
            voltage_range: self.channels.first().map(|c| c.voltage_range),
        }
    }
}

/// Holds the last successfully fetched device descriptor.
///
/// The descriptor is replaced wholesale on every update; readers get an
/// `Arc` snapshot and never observe a partially written config.
#[derive(Clone, Default)]
pub struct DeviceConfigCache {
    current: Arc<RwLock<Option<Arc<DeviceConfig>>>>,
}

impl DeviceConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new descriptor, returning the stored snapshot
    pub fn replace(&self, config: DeviceConfig) -> Arc<DeviceConfig> {
        let config = Arc::new(config);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(config.clone());
        config
    }

    pub fn get(&self) -> Option<Arc<DeviceConfig>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }
}
