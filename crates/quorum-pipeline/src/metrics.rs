//! Metrics collection for pipeline runs

use std::time::Duration;

/// Counters kept by the pipeline worker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Runs that produced a card
    pub runs_completed: usize,

    /// Runs that could not write to the board
    pub runs_failed: usize,

    /// Simulated latency spent across all completed runs
    pub total_latency: Duration,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run
    pub fn record_run(&mut self, latency: Duration) {
        self.runs_completed += 1;
        self.total_latency += latency;
    }

    /// Record a run that failed to write its card
    pub fn record_failure(&mut self) {
        self.runs_failed += 1;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Runs completed: {}", self.runs_completed),
            format!("Runs failed: {}", self.runs_failed),
            format!("Simulated latency: {}ms", self.total_latency.as_millis()),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run() {
        let mut metrics = PipelineMetrics::new();
        metrics.record_run(Duration::from_millis(1800));
        metrics.record_run(Duration::from_millis(200));
        metrics.record_failure();

        assert_eq!(metrics.runs_completed, 2);
        assert_eq!(metrics.runs_failed, 1);
        assert_eq!(metrics.total_latency, Duration::from_millis(2000));
    }

    #[test]
    fn test_summary() {
        let mut metrics = PipelineMetrics::new();
        metrics.record_run(Duration::from_millis(1800));

        let summary = metrics.summary();
        assert!(summary.contains("Runs completed: 1"));
        assert!(summary.contains("Simulated latency: 1800ms"));
    }
}
