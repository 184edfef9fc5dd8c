use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::resilience::RetryPolicy;

/// Client session configuration (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the acquisition server
    pub server_url: String,

    pub data_poll_ms: u64,
    pub probe_ms: u64,
    pub config_poll_ms: u64,

    /// Render tick of the consumer loop in the binary
    pub render_ms: u64,

    /// Per-request timeout handed to the HTTP client; None leaves it to the transport
    pub request_timeout_ms: Option<u64>,

    pub config_retry: RetryPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            data_poll_ms: 400,
            probe_ms: 500,
            config_poll_ms: 1000,
            render_ms: 50,
            request_timeout_ms: None,
            config_retry: RetryPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(value: Value) -> Result<Self> {
        let config: SessionConfig =
            serde_json::from_value(value).context("Failed to parse session config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .context(format!("Failed to read config from {:?}", path))?;
        let value: Value = serde_json::from_str(&json)
            .context(format!("Failed to parse JSON in {:?}", path))?;
        Self::from_json(value)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, period) in [
            ("data_poll_ms", self.data_poll_ms),
            ("probe_ms", self.probe_ms),
            ("config_poll_ms", self.config_poll_ms),
            ("render_ms", self.render_ms),
        ] {
            if period == 0 {
                bail!("{} must be greater than zero", name);
            }
        }
        if self.server_url.trim().is_empty() {
            bail!("server_url must not be empty");
        }
        Ok(())
    }

    pub fn data_poll_period(&self) -> Duration {
        Duration::from_millis(self.data_poll_ms)
    }

    pub fn probe_period(&self) -> Duration {
        Duration::from_millis(self.probe_ms)
    }

    pub fn config_poll_period(&self) -> Duration {
        Duration::from_millis(self.config_poll_ms)
    }

    pub fn render_period(&self) -> Duration {
        Duration::from_millis(self.render_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
