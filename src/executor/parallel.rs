//! Parallel worker execution
//!
//! Launches one worker per bucket and waits for all of them.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::command::WorkerCommand;
use super::worker::{Worker, WorkerOutcome};
use crate::models::{Bucket, SuiteMap};
use crate::output::LiveReporter;

/// Runs every bucket concurrently
pub struct ParallelExecutor {
    command: Arc<WorkerCommand>,
    live: Arc<LiveReporter>,
}

impl ParallelExecutor {
    pub fn new(command: WorkerCommand) -> Self {
        Self {
            command: Arc::new(command),
            live: Arc::new(LiveReporter::new()),
        }
    }

    pub fn with_reporter(mut self, live: LiveReporter) -> Self {
        self.live = Arc::new(live);
        self
    }

    /// Run all buckets; returns once every worker has exited
    ///
    /// Outcomes are in bucket order. Empty buckets are not dispatched and
    /// yield an empty outcome.
    pub async fn run_buckets(&self, buckets: Vec<Bucket>) -> Vec<WorkerOutcome> {
        info!("Running {} workers in parallel", buckets.len());

        let start = Instant::now();
        let mut handles = Vec::new();

        for bucket in buckets {
            let index = bucket.index;

            if bucket.is_empty() {
                warn!("Bucket {} has no specs, not starting a worker", index);
                handles.push((index, None));
                continue;
            }

            let worker = Worker::new(bucket, self.command.clone(), self.live.clone());
            handles.push((index, Some(tokio::spawn(worker.run()))));
        }

        let count = handles.len();
        let results = join_all(handles.into_iter().map(|(index, handle)| async move {
            match handle {
                Some(handle) => handle.await.unwrap_or_else(|e| {
                    error!("Worker {} task failed: {}", index, e);
                    WorkerOutcome::skipped(index)
                }),
                None => WorkerOutcome::skipped(index),
            }
        }))
        .await;

        info!(
            "All {} workers finished in {}ms",
            count,
            start.elapsed().as_millis()
        );

        results
    }

    /// Per-bucket suite results, in bucket order
    pub async fn run(&self, buckets: Vec<Bucket>) -> Vec<SuiteMap> {
        self.run_buckets(buckets)
            .await
            .into_iter()
            .map(|outcome| outcome.suites)
            .collect()
    }
}
