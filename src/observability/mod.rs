pub mod metrics;
pub mod collector;
pub mod monitor;

pub use metrics::PollMetrics;
pub use collector::{MetricsCollector, MetricsSnapshot};
pub use monitor::SessionMonitor;
