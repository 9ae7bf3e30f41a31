//! Config file layer
//!
//! A project may keep its run settings in `spec-parallel.yaml` (or `.yml`,
//! `.json`) instead of repeating flags. Keys match the long flag names in
//! snake case.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::PartialConfig;

/// Searched in order when no file is given explicitly
const CONFIG_LOCATIONS: &[&str] = &[
    "./spec-parallel.yaml",
    "./spec-parallel.yml",
    "./spec-parallel.json",
    "./.spec-parallel.yaml",
    "~/.config/spec-parallel/config.yaml",
];

const SUPPORTED_VERSION: &str = "1.0";

/// Syntax of a config file, chosen by extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parsed config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(flatten)]
    pub run: PartialConfig,
}

fn default_version() -> String {
    SUPPORTED_VERSION.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            run: PartialConfig::default(),
        }
    }
}

impl ConfigFile {
    /// First standard location that exists
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.is_file())
    }

    /// Load the explicit file, else the first one found; no file is an empty layer
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        let Some(path) = explicit.map(Path::to_path_buf).or_else(Self::find) else {
            debug!("No config file, using flags and environment only");
            return Ok(Self::default());
        };

        debug!("Using config file {}", path.display());
        Self::load(&path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, ConfigFormat::of(path))
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).context("Malformed YAML")?,
            ConfigFormat::Json => serde_json::from_str(content).context("Malformed JSON")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            anyhow::bail!(
                "Unsupported config version {} (expected {})",
                self.version,
                SUPPORTED_VERSION
            );
        }

        if self.run.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }

        Ok(())
    }
}

/// `~/` prefix resolved against the home directory
fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
