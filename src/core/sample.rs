use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque channel key, stable for the lifetime of a device configuration
pub type ChannelId = String;

/// One voltage reading as received from the acquisition server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub value: f64,

    /// Device-relative time in milliseconds, shared origin across channels
    pub device_time_ms: f64,

    /// Wall-clock timestamp in milliseconds, used for rate estimation
    pub wall_clock_ms: f64,
}

impl Sample {
    pub fn new(value: f64, device_time_ms: f64, wall_clock_ms: f64) -> Self {
        Self {
            value,
            device_time_ms,
            wall_clock_ms,
        }
    }

    pub fn to_point(&self) -> Point {
        Point {
            x: self.device_time_ms,
            y: self.value,
        }
    }
}

/// Chart point handed to the visualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// New samples per channel from a single poll
pub type ChannelBatch = BTreeMap<ChannelId, Vec<Sample>>;
