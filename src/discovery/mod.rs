//! Spec discovery
//!
//! Recursively lists every file under the spec root.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::SpecPath;

/// Walks a spec directory
pub struct SpecDiscoverer {
    root: PathBuf,
}

impl SpecDiscoverer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all files below the root, depth-first in name order
    ///
    /// Symlinked directories are followed. Any unreadable entry fails the
    /// whole discovery.
    pub fn discover(&self) -> Result<Vec<SpecPath>> {
        let metadata = fs::metadata(&self.root)
            .with_context(|| format!("Failed to read spec directory: {}", self.root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Spec path is not a directory: {}", self.root.display());
        }

        let mut specs = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to read spec directory: {}", self.root.display())
            })?;

            if entry.file_type().is_file() {
                specs.push(SpecPath::new(&self.root, entry.into_path()));
            }
        }

        debug!("Discovered {} spec files in {}", specs.len(), self.root.display());

        Ok(specs)
    }
}
