use thiserror::Error;

/// Failures talking to the acquisition server.
///
/// None of these are fatal: pollers log them and carry on, and the
/// liveness probe turns them into a connection-state signal.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },
}

impl TelemetryError {
    pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => endpoint,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

pub type TelemetryResult<T> = std::result::Result<T, TelemetryError>;
