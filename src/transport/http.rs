use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use super::wire::{self, ALIVE_ENDPOINT, DATA_ENDPOINT, DEVICE_INFO_ENDPOINT};
use super::TelemetryTransport;
use crate::core::{ChannelBatch, DeviceConfig};
use crate::error::{TelemetryError, TelemetryResult};

/// HTTP/JSON transport against the acquisition server's `/api` routes
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> TelemetryResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TelemetryError::transport("client", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET `endpoint`, failing on transport errors and non-2xx statuses
    async fn get(&self, endpoint: &str) -> TelemetryResult<reqwest::Response> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| TelemetryError::transport(endpoint, e))?;

        check_status(endpoint, response.status())?;
        Ok(response)
    }

    async fn get_text(&self, endpoint: &str) -> TelemetryResult<String> {
        self.get(endpoint)
            .await?
            .text()
            .await
            .map_err(|e| TelemetryError::transport(endpoint, e))
    }
}

fn check_status(endpoint: &str, status: StatusCode) -> TelemetryResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TelemetryError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl TelemetryTransport for HttpTransport {
    async fn fetch_data(&self) -> TelemetryResult<ChannelBatch> {
        let body = self.get_text(DATA_ENDPOINT).await?;
        wire::parse_data(&body)
    }

    async fn probe_alive(&self) -> TelemetryResult<()> {
        self.get(ALIVE_ENDPOINT).await.map(|_| ())
    }

    async fn fetch_device_info(&self) -> TelemetryResult<DeviceConfig> {
        let body = self.get_text(DEVICE_INFO_ENDPOINT).await?;
        wire::parse_device_info(&body)
    }
}
