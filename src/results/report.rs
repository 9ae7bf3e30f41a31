//! Run report
//!
//! Everything the final report shows about one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResultAggregator;
use crate::models::{RunSummary, SuiteResult};

/// Final report of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Buckets used (after thread reduction)
    pub threads: usize,
    /// Number of discovered specs
    pub specs: usize,
    pub suites: Vec<SuiteResult>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        threads: usize,
        specs: usize,
        aggregator: ResultAggregator,
        wall_clock_ms: u64,
    ) -> Self {
        let summary = aggregator.summary(wall_clock_ms);
        Self {
            started_at,
            completed_at: Utc::now(),
            threads,
            specs,
            suites: aggregator.into_suites().into_iter().collect(),
            summary,
        }
    }

    pub fn success(&self) -> bool {
        !self.summary.has_failures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuiteMap;

    #[test]
    fn test_report_from_aggregator() {
        let mut suites = SuiteMap::new();
        suites.insert(SuiteResult {
            title: "Profile".to_string(),
            duration_ms: 420,
            tests: 2,
            passes: 2,
            ..Default::default()
        });

        let report = RunReport::new(
            Utc::now(),
            2,
            3,
            ResultAggregator::from_workers(vec![suites, SuiteMap::new()]),
            900,
        );

        assert_eq!(report.suites.len(), 1);
        assert_eq!(report.summary.total_duration_ms, 900);
        assert_eq!(report.summary.worker_durations_ms, vec![420, 0]);
        assert!(report.success());
        assert!(report.completed_at >= report.started_at);
    }
}
