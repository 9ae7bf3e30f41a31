//! Weight file persistence
//!
//! The weight file is a JSON object mapping a spec suffix key to the
//! duration observed on the last run and the derived weight.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{millis, Weight};

/// Default weight file location, relative to the working directory
pub const DEFAULT_WEIGHTS_FILE: &str = "cypress/parallel-weights.json";

/// Persisted record for one spec
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Observed duration in milliseconds
    #[serde(default, deserialize_with = "millis")]
    pub time: u64,
    #[serde(default)]
    pub weight: Weight,
}

impl WeightRecord {
    pub fn new(time: u64, weight: Weight) -> Self {
        Self { time, weight }
    }
}

/// Suffix key to record, enumerated in key order
pub type WeightTable = BTreeMap<String, WeightRecord>;

/// Reads and writes the weight file
#[derive(Clone, Debug)]
pub struct WeightStore {
    path: PathBuf,
}

impl WeightStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the table; a missing or unparseable file yields an empty table
    pub fn load(&self) -> WeightTable {
        match self.try_load() {
            Ok(table) => {
                debug!(
                    "Loaded {} weight records from {}",
                    table.len(),
                    self.path.display()
                );
                table
            }
            Err(e) => {
                warn!("Weight file not found in path: {} ({:#})", self.path.display(), e);
                WeightTable::new()
            }
        }
    }

    fn try_load(&self) -> Result<WeightTable> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read weight file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse weight file: {}", self.path.display()))
    }

    /// Overwrite the weight file with a fresh table
    pub fn save(&self, table: &WeightTable) -> Result<()> {
        let content =
            serde_json::to_string_pretty(table).context("Failed to serialize weight table")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write weight file: {}", self.path.display()))?;

        info!(
            "Generated weight file {} ({} records)",
            self.path.display(),
            table.len()
        );
        Ok(())
    }
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS_FILE)
    }
}
