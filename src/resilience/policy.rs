use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a failed request is retried before giving up until the next tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Single attempt, no retry
    Never,

    /// Retry right away, up to `max_attempts` attempts in total
    Immediate { max_attempts: usize },

    /// Exponential backoff between attempts
    Exponential {
        base_ms: u64,
        max_ms: u64,
        max_attempts: usize,
    },
}

impl RetryPolicy {
    /// Total number of attempts, including the first one
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryPolicy::Never => 1,
            RetryPolicy::Immediate { max_attempts }
            | RetryPolicy::Exponential { max_attempts, .. } => (*max_attempts).max(1),
        }
    }

    /// Delay before retry number `retry` (1-based), or None when the
    /// attempt budget is spent
    pub fn delay_for(&self, retry: usize) -> Option<Duration> {
        if retry == 0 || retry >= self.max_attempts() {
            return None;
        }

        match self {
            RetryPolicy::Never => None,
            RetryPolicy::Immediate { .. } => Some(Duration::ZERO),
            RetryPolicy::Exponential { base_ms, max_ms, .. } => {
                let factor = 1u64.checked_shl((retry - 1) as u32).unwrap_or(u64::MAX);
                let delay = base_ms.saturating_mul(factor).min(*max_ms);
                Some(Duration::from_millis(delay))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Exponential {
            base_ms: 100,
            max_ms: 1600,
            max_attempts: 4,
        }
    }
}
