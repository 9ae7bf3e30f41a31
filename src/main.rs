//! spec-parallel - Weight-balanced parallel test spec runner
//!
//! Splits a directory of test specs (Cypress-style) into buckets of roughly
//! equal expected duration, runs one test-runner process per bucket, and
//! merges the JSON event streams of all workers into a single report.
//!
//! ## Features
//!
//! - Weights learned from previous runs, stored in a JSON weight file
//! - Greedy longest-first bucket packing
//! - Live per-test output from every worker
//! - Multiple report formats (Table, JSON, CSV)
//!
//! ## Usage
//!
//! ```bash
//! # Run the `cy:run` script with 4 workers
//! spec-parallel --script cy:run --threads 4
//!
//! # Run and refresh the weight file for the next run
//! spec-parallel -s cy:run -t 4 -w
//!
//! # Pass arguments through to the script
//! spec-parallel -s cy:run -a "--browser chrome"
//!
//! # Show the bucket plan without running anything
//! spec-parallel -s cy:run -t 4 --plan
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

mod cli;
mod config;
mod discovery;
mod executor;
mod models;
mod output;
mod partition;
mod results;
mod utils;
mod weights;

use cli::Args;
use config::{ConfigFile, EnvConfig, RunConfig};
use executor::SpecRunner;
use output::ReportFormatter;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(LogLevel::resolve(
        args.verbose,
        args.log_level.as_deref(),
        env.log_level.as_deref(),
    ));

    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));
    let file = ConfigFile::load_default(config_path.as_deref())?;
    let config = RunConfig::resolve([file.run, env.to_partial(), args.to_partial()])?;

    let runner = SpecRunner::new(config);

    if args.plan {
        show_plan(&runner)?;
        return Ok(ExitCode::SUCCESS);
    }

    run_specs(&runner).await
}

fn formatter(config: &RunConfig) -> ReportFormatter {
    let formatter = ReportFormatter::new(config.format);
    if config.colorize {
        formatter
    } else {
        formatter.no_color()
    }
}

fn show_plan(runner: &SpecRunner) -> Result<()> {
    let plan = runner.plan()?;
    let command = runner.worker_command();

    println!(
        "{} specs in {} buckets\n",
        plan.spec_count,
        plan.buckets.len()
    );
    print!(
        "{}",
        formatter(runner.config()).format_plan(&plan.buckets, |b| command.display_for(b))
    );

    Ok(())
}

async fn run_specs(runner: &SpecRunner) -> Result<ExitCode> {
    let outcome = runner.run().await?;

    println!("{}", formatter(runner.config()).format_report(&outcome.report)?);

    if let Some(weights) = &outcome.weights {
        runner
            .persist_weights(weights)
            .context("Failed to persist spec weights")?;
        println!(
            "Generated file {}.",
            runner.config().weights_file.display()
        );
    }

    if outcome.report.success() {
        Ok(ExitCode::SUCCESS)
    } else {
        info!(
            "{} test(s) failed",
            outcome.report.summary.total_failures
        );
        Ok(ExitCode::FAILURE)
    }
}
