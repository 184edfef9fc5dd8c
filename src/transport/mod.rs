pub mod http;
pub mod mock;
pub mod wire;

pub use http::HttpTransport;
pub use mock::MockTransport;
pub use wire::{DataResponse, DeviceInfoResponse};

use async_trait::async_trait;

use crate::core::{ChannelBatch, DeviceConfig};
use crate::error::TelemetryResult;

/// Request/response channel to the acquisition server
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    /// Samples received since the previous call, keyed by channel
    async fn fetch_data(&self) -> TelemetryResult<ChannelBatch>;

    /// Health probe; any error means the server is unreachable
    async fn probe_alive(&self) -> TelemetryResult<()>;

    async fn fetch_device_info(&self) -> TelemetryResult<DeviceConfig>;
}
