//! Result aggregation
//!
//! Merges every worker's suites into one mapping and sums the totals.

#![allow(dead_code)]

use tracing::debug;

use crate::models::{RunSummary, SuiteMap};

/// Collects finished workers' results
#[derive(Clone, Debug, Default)]
pub struct ResultAggregator {
    suites: SuiteMap,
    worker_durations_ms: Vec<u64>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate workers in bucket order
    pub fn from_workers(workers: Vec<SuiteMap>) -> Self {
        let mut aggregator = Self::new();
        for suites in workers {
            aggregator.add_worker(suites);
        }
        aggregator
    }

    /// Fold in one worker; its suites overwrite same-titled earlier ones
    pub fn add_worker(&mut self, suites: SuiteMap) {
        let duration = suites.total_duration_ms();
        debug!(
            "Worker {} contributed {} suites ({}ms)",
            self.worker_durations_ms.len(),
            suites.len(),
            duration
        );
        self.worker_durations_ms.push(duration);
        self.suites.extend(suites);
    }

    pub fn suites(&self) -> &SuiteMap {
        &self.suites
    }

    /// Sum of suite durations per worker
    pub fn worker_durations_ms(&self) -> &[u64] {
        &self.worker_durations_ms
    }

    /// Totals over the merged suites
    pub fn summary(&self, wall_clock_ms: u64) -> RunSummary {
        let mut summary = RunSummary {
            total_duration_ms: wall_clock_ms,
            worker_durations_ms: self.worker_durations_ms.clone(),
            ..Default::default()
        };

        for suite in self.suites.iter() {
            summary.total_tests += suite.tests;
            summary.total_passes += suite.passes;
            summary.total_failures += suite.failures;
            summary.total_pending += suite.pending;
        }

        summary
    }

    pub fn into_suites(self) -> SuiteMap {
        self.suites
    }
}
