pub mod buffers;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod observability;
pub mod rate;
pub mod resilience;
pub mod transport;
pub mod visualization;

pub use error::{TelemetryError, TelemetryResult};
