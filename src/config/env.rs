//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use super::PartialConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "SPEC_PARALLEL";

/// Configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Script from SPEC_PARALLEL_SCRIPT
    pub script: Option<String>,
    /// Threads from SPEC_PARALLEL_THREADS
    pub threads: Option<usize>,
    /// Spec directory from SPEC_PARALLEL_SPECS_DIR
    pub specs_dir: Option<String>,
    /// Script arguments from SPEC_PARALLEL_ARGS
    pub args: Option<String>,
    /// Write weights from SPEC_PARALLEL_WRITE_WEIGHTS
    pub write_weights: Option<bool>,
    /// Weight file from SPEC_PARALLEL_WEIGHTS_FILE
    pub weights_file: Option<String>,
    /// Reporter from SPEC_PARALLEL_REPORTER
    pub reporter: Option<String>,
    /// Package manager from SPEC_PARALLEL_PACKAGE_MANAGER
    pub package_manager: Option<String>,
    /// Output format from SPEC_PARALLEL_FORMAT
    pub format: Option<String>,
    /// Config file from SPEC_PARALLEL_CONFIG
    pub config_file: Option<String>,
    /// Log level from SPEC_PARALLEL_LOG
    pub log_level: Option<String>,
    /// Set when NO_COLOR is present
    pub no_color: bool,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}_{name}")).filter(|v| !v.is_empty())
        };

        Self {
            script: get("SCRIPT"),
            threads: get("THREADS").and_then(|v| v.parse().ok()),
            specs_dir: get("SPECS_DIR"),
            args: get("ARGS"),
            write_weights: get("WRITE_WEIGHTS").and_then(|v| parse_bool(&v)),
            weights_file: get("WEIGHTS_FILE"),
            reporter: get("REPORTER"),
            package_manager: get("PACKAGE_MANAGER"),
            format: get("FORMAT"),
            config_file: get("CONFIG"),
            log_level: get("LOG"),
            no_color: lookup("NO_COLOR").is_some_and(|v| !v.is_empty()),
        }
    }

    /// Run settings as a configuration layer
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            script: self.script.clone(),
            threads: self.threads,
            specs_dir: self.specs_dir.as_ref().map(PathBuf::from),
            args: self.args.clone(),
            write_weights: self.write_weights,
            weights_file: self.weights_file.as_ref().map(PathBuf::from),
            reporter: self.reporter.clone(),
            package_manager: self.package_manager.clone(),
            format: self.format.clone(),
            color: self.no_color.then_some(false),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
