pub mod device_config;
pub mod sample;

pub use device_config::{ChannelDescriptor, DeviceConfig, DeviceConfigCache, DeviceSummary};
pub use sample::{ChannelBatch, ChannelId, Point, Sample};
