use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{ChannelBatch, ChannelDescriptor, DeviceConfig, Sample};
use crate::error::{TelemetryError, TelemetryResult};

pub const DATA_ENDPOINT: &str = "/api/data";
pub const ALIVE_ENDPOINT: &str = "/api/alive";
pub const DEVICE_INFO_ENDPOINT: &str = "/api/device-info";

/// `GET /api/data` body: `[value, deviceTimeMs, wallClockTimestamp]` triples per channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataResponse {
    #[serde(default)]
    pub voltages: BTreeMap<String, Vec<(f64, f64, f64)>>,
}

impl DataResponse {
    pub fn into_batch(self) -> ChannelBatch {
        self.voltages
            .into_iter()
            .map(|(channel, triples)| {
                let samples = triples
                    .into_iter()
                    .map(|(value, device_time_ms, wall_clock_ms)| {
                        Sample::new(value, device_time_ms, wall_clock_ms)
                    })
                    .collect();
                (channel, samples)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub channel: String,
    pub virt_channels: u32,
    pub voltage_range: f64,
}

/// `GET /api/device-info` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfoResponse {
    pub pico_scope_type: String,
    pub refresh_rate: f64,
    pub channel_info: Vec<ChannelInfo>,
}

impl From<DeviceInfoResponse> for DeviceConfig {
    fn from(info: DeviceInfoResponse) -> Self {
        DeviceConfig {
            device_label: info.pico_scope_type,
            refresh_rate_hz: info.refresh_rate,
            channels: info
                .channel_info
                .into_iter()
                .map(|c| ChannelDescriptor {
                    id: c.channel,
                    virtual_channel_count: c.virt_channels,
                    voltage_range: c.voltage_range,
                })
                .collect(),
        }
    }
}

pub fn parse_data(body: &str) -> TelemetryResult<ChannelBatch> {
    let response: DataResponse = serde_json::from_str(body)
        .map_err(|e| TelemetryError::malformed(DATA_ENDPOINT, e))?;
    Ok(response.into_batch())
}

pub fn parse_device_info(body: &str) -> TelemetryResult<DeviceConfig> {
    let response: DeviceInfoResponse = serde_json::from_str(body)
        .map_err(|e| TelemetryError::malformed(DEVICE_INFO_ENDPOINT, e))?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_preserves_order() {
        let body = r#"{"voltages": {"A": [[0.5, 10.0, 1000.0], [0.7, 11.0, 1001.0]], "B": []}}"#;
        let batch = parse_data(body).unwrap();

        assert_eq!(batch["A"].len(), 2);
        assert_eq!(batch["A"][0], Sample::new(0.5, 10.0, 1000.0));
        assert_eq!(batch["A"][1].device_time_ms, 11.0);
        assert!(batch["B"].is_empty());
    }

    #[test]
    fn test_parse_empty_mapping() {
        assert!(parse_data(r#"{"voltages": {}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_data_rejects_wrong_shape() {
        let err = parse_data(r#"{"voltages": {"A": [[0.5, 10.0]]}}"#).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.endpoint(), DATA_ENDPOINT);
    }

    #[test]
    fn test_parse_device_info() {
        let body = r#"{
            "pico_scope_type": "4000A",
            "refresh_rate": 1000,
            "channel_info": [
                {"channel": "A", "virt_channels": 2, "voltage_range": 5},
                {"channel": "B", "virt_channels": 1, "voltage_range": 5}
            ]
        }"#;
        let config = parse_device_info(body).unwrap();

        assert_eq!(config.device_label, "4000A");
        assert_eq!(config.refresh_rate_hz, 1000.0);
        assert_eq!(config.channel_count(), 2);
        assert_eq!(config.virtual_channel_count(), 3);
    }

    #[test]
    fn test_parse_device_info_missing_field() {
        let err = parse_device_info(r#"{"pico_scope_type": "4000A"}"#).unwrap_err();
        assert!(err.is_malformed());
    }
}
