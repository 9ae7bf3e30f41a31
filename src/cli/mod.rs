//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::PartialConfig;

/// Run a test spec suite across parallel workers, balanced by past durations
#[derive(Parser, Debug)]
#[command(name = "spec-parallel")]
#[command(version)]
#[command(about = "Run test specs in parallel workers balanced by historical weights")]
#[command(long_about = None)]
pub struct Args {
    /// Package script that runs your tests (e.g. cy:run)
    #[arg(short, long)]
    pub script: Option<String>,

    /// Number of parallel workers [default: 2]
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Directory containing the spec files [default: cypress/integration]
    #[arg(short = 'd', long, alias = "specsDir")]
    pub specs_dir: Option<PathBuf>,

    /// Extra arguments passed to the script, space separated
    #[arg(short, long, allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Write the weight file after the run
    #[arg(short, long, alias = "writeWeightFile")]
    pub write_weight_file: bool,

    /// Weight file path [default: cypress/parallel-weights.json]
    #[arg(long)]
    pub weights_file: Option<PathBuf>,

    /// Reporter the test runner should use to emit JSON events
    #[arg(short, long)]
    pub reporter: Option<String>,

    /// Package manager used to run the script (npm, yarn, pnpm)
    #[arg(long)]
    pub package_manager: Option<String>,

    /// Report format (table, json, json-pretty, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the bucket plan and exit without running anything
    #[arg(long)]
    pub plan: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Flags as the highest-precedence configuration layer
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            script: self.script.clone(),
            threads: self.threads,
            specs_dir: self.specs_dir.clone(),
            args: self.args.clone(),
            write_weights: self.write_weight_file.then_some(true),
            weights_file: self.weights_file.clone(),
            reporter: self.reporter.clone(),
            package_manager: self.package_manager.clone(),
            format: self.format.clone(),
            color: self.no_color.then_some(false),
        }
    }
}
