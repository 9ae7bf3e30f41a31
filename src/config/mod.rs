//! Configuration module
//!
//! Run settings are layered: built-in defaults, then an optional config
//! file, then `SPEC_PARALLEL_*` environment variables, then CLI flags.

#![allow(dead_code)]

mod env;
mod file;

pub use env::EnvConfig;
pub use file::ConfigFile;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::executor::{PackageManager, DEFAULT_REPORTER};
use crate::output::OutputFormat;
use crate::weights::DEFAULT_WEIGHTS_FILE;

/// Default spec root
pub const DEFAULT_SPECS_DIR: &str = "cypress/integration";

/// Default number of workers
pub const DEFAULT_THREADS: usize = 2;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected command, e.g.: spec-parallel --script <cypress-script>")]
    MissingScript,

    #[error("Thread count must be at least 1, got {0}")]
    InvalidThreads(usize),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Unknown package manager: {0}")]
    UnknownPackageManager(String),
}

/// One configuration layer; unset fields fall through to lower layers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PartialConfig {
    /// Package script that runs the test runner
    pub script: Option<String>,
    pub threads: Option<usize>,
    pub specs_dir: Option<PathBuf>,
    /// Extra arguments for the script, space separated
    pub args: Option<String>,
    pub write_weights: Option<bool>,
    pub weights_file: Option<PathBuf>,
    pub reporter: Option<String>,
    pub package_manager: Option<String>,
    pub format: Option<String>,
    pub color: Option<bool>,
}

impl PartialConfig {
    /// Overlay `other` on top of `self`
    pub fn merge(self, other: PartialConfig) -> Self {
        Self {
            script: other.script.or(self.script),
            threads: other.threads.or(self.threads),
            specs_dir: other.specs_dir.or(self.specs_dir),
            args: other.args.or(self.args),
            write_weights: other.write_weights.or(self.write_weights),
            weights_file: other.weights_file.or(self.weights_file),
            reporter: other.reporter.or(self.reporter),
            package_manager: other.package_manager.or(self.package_manager),
            format: other.format.or(self.format),
            color: other.color.or(self.color),
        }
    }
}

/// Fully resolved run configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub script: String,
    pub threads: usize,
    pub specs_dir: PathBuf,
    pub script_args: Vec<String>,
    pub write_weights: bool,
    pub weights_file: PathBuf,
    pub reporter: String,
    pub package_manager: PackageManager,
    pub format: OutputFormat,
    pub colorize: bool,
}

impl RunConfig {
    /// Resolve layers, lowest precedence first
    pub fn resolve(layers: impl IntoIterator<Item = PartialConfig>) -> Result<Self, ConfigError> {
        let merged = layers
            .into_iter()
            .fold(PartialConfig::default(), PartialConfig::merge);

        let script = merged
            .script
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingScript)?;

        let threads = merged.threads.unwrap_or(DEFAULT_THREADS);
        if threads == 0 {
            return Err(ConfigError::InvalidThreads(threads));
        }

        let package_manager = match merged.package_manager {
            Some(pm) => PackageManager::from_str(&pm)
                .ok_or(ConfigError::UnknownPackageManager(pm))?,
            None => PackageManager::detect(),
        };

        let format = match merged.format {
            Some(f) => OutputFormat::from_str(&f).ok_or(ConfigError::UnknownFormat(f))?,
            None => OutputFormat::Table,
        };

        Ok(Self {
            script,
            threads,
            specs_dir: merged
                .specs_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SPECS_DIR)),
            script_args: split_args(merged.args.as_deref()),
            write_weights: merged.write_weights.unwrap_or(false),
            weights_file: merged
                .weights_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHTS_FILE)),
            reporter: merged
                .reporter
                .unwrap_or_else(|| DEFAULT_REPORTER.to_string()),
            package_manager,
            format,
            colorize: merged.color.unwrap_or(true),
        })
    }
}

/// Split pass-through arguments on whitespace
pub fn split_args(args: Option<&str>) -> Vec<String> {
    args.map(|a| a.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_script(script: &str) -> PartialConfig {
        PartialConfig {
            script: Some(script.to_string()),
            package_manager: Some("npm".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::resolve([with_script("cy:run")]).unwrap();
        assert_eq!(config.script, "cy:run");
        assert_eq!(config.threads, 2);
        assert_eq!(config.specs_dir, PathBuf::from("cypress/integration"));
        assert!(config.script_args.is_empty());
        assert!(!config.write_weights);
        assert_eq!(config.weights_file, PathBuf::from("cypress/parallel-weights.json"));
        assert_eq!(config.reporter, DEFAULT_REPORTER);
        assert_eq!(config.package_manager, PackageManager::Npm);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.colorize);
    }

    #[test]
    fn test_missing_script() {
        assert_eq!(
            RunConfig::resolve([PartialConfig::default()]),
            Err(ConfigError::MissingScript)
        );
        assert_eq!(
            RunConfig::resolve([with_script("  ")]),
            Err(ConfigError::MissingScript)
        );
    }

    #[test]
    fn test_zero_threads_rejected() {
        let layer = PartialConfig {
            threads: Some(0),
            ..with_script("e2e")
        };
        assert_eq!(
            RunConfig::resolve([layer]),
            Err(ConfigError::InvalidThreads(0))
        );
    }

    #[test]
    fn test_later_layers_win() {
        let file = PartialConfig {
            threads: Some(4),
            specs_dir: Some(PathBuf::from("e2e/specs")),
            write_weights: Some(true),
            ..with_script("from-file")
        };
        let env = PartialConfig {
            threads: Some(6),
            ..Default::default()
        };
        let cli = PartialConfig {
            script: Some("from-cli".to_string()),
            args: Some("--browser  chrome --headless".to_string()),
            ..Default::default()
        };

        let config = RunConfig::resolve([file, env, cli]).unwrap();
        assert_eq!(config.script, "from-cli");
        assert_eq!(config.threads, 6);
        assert_eq!(config.specs_dir, PathBuf::from("e2e/specs"));
        assert!(config.write_weights);
        assert_eq!(config.script_args, vec!["--browser", "chrome", "--headless"]);
    }

    #[test]
    fn test_unknown_values() {
        let layer = PartialConfig {
            format: Some("xml".to_string()),
            ..with_script("e2e")
        };
        assert_eq!(
            RunConfig::resolve([layer]),
            Err(ConfigError::UnknownFormat("xml".to_string()))
        );

        let layer = PartialConfig {
            package_manager: Some("bun".to_string()),
            ..with_script("e2e")
        };
        assert_eq!(
            RunConfig::resolve([layer]),
            Err(ConfigError::UnknownPackageManager("bun".to_string()))
        );
    }

    #[test]
    fn test_split_args() {
        assert!(split_args(None).is_empty());
        assert!(split_args(Some("   ")).is_empty());
        assert_eq!(split_args(Some("--env a=1")), vec!["--env", "a=1"]);
    }
}
