//! Spec file models
//!
//! Defines discovered spec paths, their weights, and the buckets they are
//! partitioned into.

use std::fmt;
use std::path::{Path, PathBuf};

/// Weight unit used for load balancing
pub type Weight = u64;

/// A discovered test spec file
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpecPath {
    /// Full path as discovered (root joined with the relative part)
    path: PathBuf,
    /// Path relative to the spec root, `/`-separated
    key: String,
}

impl SpecPath {
    /// Create a spec path relative to the given discovery root
    pub fn new(root: impl AsRef<Path>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relative = path.strip_prefix(root.as_ref()).unwrap_or(&path);
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Self { path, key }
    }

    /// Full path of the spec
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Suffix key used when the weight table is keyed by relative path
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path as passed to the worker
    pub fn as_arg(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Whether a persisted weight key is a suffix of this spec's path
    pub fn matches_key(&self, key: &str) -> bool {
        self.as_arg().ends_with(key)
    }
}

impl fmt::Display for SpecPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A spec with its resolved weight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedSpec {
    pub spec: SpecPath,
    pub weight: Weight,
    /// Whether the weight came from the persisted table
    pub known: bool,
}

impl WeightedSpec {
    pub fn new(spec: SpecPath, weight: Weight) -> Self {
        Self {
            spec,
            weight,
            known: false,
        }
    }

    pub fn known(mut self) -> Self {
        self.known = true;
        self
    }
}

/// Specs assigned to one worker
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    pub index: usize,
    pub specs: Vec<SpecPath>,
    pub weight: Weight,
}

impl Bucket {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            specs: Vec::new(),
            weight: 0,
        }
    }

    pub fn push(&mut self, spec: SpecPath, weight: Weight) {
        self.specs.push(spec);
        self.weight += weight;
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// The `--spec` argument: comma-joined and wrapped in single quotes
    pub fn spec_arg(&self) -> String {
        let joined = self
            .specs
            .iter()
            .map(SpecPath::as_arg)
            .collect::<Vec<_>>()
            .join(",");
        format!("'{joined}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_key_is_relative() {
        let spec = SpecPath::new("cypress/integration", "cypress/integration/auth/login.spec.js");
        assert_eq!(spec.key(), "auth/login.spec.js");
        assert!(spec.matches_key("login.spec.js"));
        assert!(spec.matches_key("auth/login.spec.js"));
        assert!(!spec.matches_key("logout.spec.js"));
    }

    #[test]
    fn test_spec_outside_root_keeps_full_path() {
        let spec = SpecPath::new("elsewhere", "a/b.js");
        assert_eq!(spec.key(), "a/b.js");
    }

    #[test]
    fn test_bucket_spec_arg() {
        let mut bucket = Bucket::new(0);
        bucket.push(SpecPath::new("r", "r/a.js"), 3);
        bucket.push(SpecPath::new("r", "r/b.js"), 2);

        assert_eq!(bucket.weight, 5);
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.spec_arg(), "'r/a.js,r/b.js'");
    }

    #[test]
    fn test_empty_bucket_spec_arg() {
        let bucket = Bucket::new(3);
        assert!(bucket.is_empty());
        assert_eq!(bucket.spec_arg(), "''");
    }
}
