use std::collections::BTreeMap;
use std::sync::Arc;
use super::PollMetrics;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub task_id: String,
    pub successes: u64,
    pub failures: u64,
    pub samples_appended: u64,
    pub stale_discarded: u64,
    pub avg_latency_us: u64,
}

#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<String, Arc<PollMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, metrics: Arc<PollMetrics>) {
        self.metrics.insert(metrics.task_id().to_string(), metrics);
    }

    pub fn snapshot(&self) -> BTreeMap<String, MetricsSnapshot> {
        self.metrics
            .iter()
            .map(|(id, metrics)| {
                (
                    id.clone(),
                    MetricsSnapshot {
                        task_id: metrics.task_id().to_string(),
                        successes: metrics.successes(),
                        failures: metrics.failures(),
                        samples_appended: metrics.samples_appended(),
                        stale_discarded: metrics.stale_discarded(),
                        avg_latency_us: metrics.avg_latency_us(),
                    },
                )
            })
            .collect()
    }

    pub fn get(&self, task_id: &str) -> Option<Arc<PollMetrics>> {
        self.metrics.get(task_id).cloned()
    }
}
