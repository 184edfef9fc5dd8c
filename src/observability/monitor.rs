use super::MetricsCollector;

pub struct SessionMonitor {
    collector: MetricsCollector,
}

impl SessionMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No tasks registered".to_string();
        }

        let mut report = String::from("=== Session Metrics ===\n");

        for (task_id, metrics) in snapshot.iter() {
            report.push_str(&format!(
                "\n[{}]\n  Requests: {} ok, {}\n  Samples: {} appended, {} stale batch{} discarded\n  Avg Latency: {}μs\n",
                task_id,
                metrics.successes,
                if metrics.failures == 1 {
                    "1 failure".to_string()
                } else {
                    format!("{} failures", metrics.failures)
                },
                metrics.samples_appended,
                metrics.stale_discarded,
                if metrics.stale_discarded == 1 { "" } else { "es" },
                metrics.avg_latency_us
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
