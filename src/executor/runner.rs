//! Spec run pipeline
//!
//! Discovery, weighting, partitioning, parallel execution, aggregation and
//! weight recomputation for one run.

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use super::command::WorkerCommand;
use super::parallel::ParallelExecutor;
use crate::config::RunConfig;
use crate::discovery::SpecDiscoverer;
use crate::models::Bucket;
use crate::output::LiveReporter;
use crate::partition::Partitioner;
use crate::results::{ResultAggregator, RunReport};
use crate::utils::Stopwatch;
use crate::weights::{recompute, WeightAssigner, WeightStore, WeightTable};

/// Buckets a run will execute
#[derive(Clone, Debug)]
pub struct RunPlan {
    pub spec_count: usize,
    pub buckets: Vec<Bucket>,
}

/// Result of a run, before weights are persisted
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    /// Fresh weight table, present when weight writing was requested
    pub weights: Option<WeightTable>,
}

/// Runs a spec suite in parallel
pub struct SpecRunner {
    config: RunConfig,
    live: LiveReporter,
}

impl SpecRunner {
    pub fn new(config: RunConfig) -> Self {
        let live = if config.colorize {
            LiveReporter::new()
        } else {
            LiveReporter::new().no_color()
        };
        Self { config, live }
    }

    pub fn with_reporter(mut self, live: LiveReporter) -> Self {
        self.live = live;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn weight_store(&self) -> WeightStore {
        WeightStore::new(&self.config.weights_file)
    }

    /// Command used for every worker
    pub fn worker_command(&self) -> WorkerCommand {
        WorkerCommand::script(self.config.package_manager, &self.config.script)
            .with_reporter(&self.config.reporter)
            .with_extra_args(self.config.script_args.clone())
    }

    /// Discover, weigh and partition specs
    pub fn plan(&self) -> Result<RunPlan> {
        self.plan_with_rng(&mut rand::rng())
    }

    pub fn plan_with_rng<R: Rng>(&self, rng: &mut R) -> Result<RunPlan> {
        let specs = SpecDiscoverer::new(&self.config.specs_dir).discover()?;
        let table = self.weight_store().load();

        info!(
            "Preparing to run {} spec files. Please wait, the first result may take a bit of time to appear.",
            specs.len()
        );

        let weighted = WeightAssigner::new(&table).assign(&specs, rng);
        let partitioner = Partitioner::for_specs(self.config.threads, specs.len());
        let buckets = partitioner.partition(weighted);

        for bucket in &buckets {
            info!(
                "Thread {}: {} specs, weight {}",
                bucket.index,
                bucket.len(),
                bucket.weight
            );
        }

        Ok(RunPlan {
            spec_count: specs.len(),
            buckets,
        })
    }

    /// Execute the whole run
    pub async fn run(&self) -> Result<RunOutcome> {
        let started_at = Utc::now();
        let mut stopwatch = Stopwatch::new();

        let plan = self.plan()?;
        stopwatch.lap("plan");

        let threads = plan.buckets.len();
        let executor =
            ParallelExecutor::new(self.worker_command()).with_reporter(self.live.clone());
        let results = executor.run(plan.buckets).await;
        stopwatch.lap("workers");

        let aggregator = ResultAggregator::from_workers(results);
        let weights = self
            .config
            .write_weights
            .then(|| recompute(aggregator.suites()));

        let report = RunReport::new(
            started_at,
            threads,
            plan.spec_count,
            aggregator,
            stopwatch.elapsed_ms(),
        );
        stopwatch.lap("aggregate");
        debug!("Run timings: {}", stopwatch.summary());

        info!(
            "Run completed: {}/{} passed, {} failed, {} pending",
            report.summary.total_passes,
            report.summary.total_tests,
            report.summary.total_failures,
            report.summary.total_pending
        );

        Ok(RunOutcome { report, weights })
    }

    /// Overwrite the weight file
    pub fn persist_weights(&self, table: &WeightTable) -> Result<()> {
        self.weight_store().save(table)
    }
}
