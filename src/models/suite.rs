//! Suite result models
//!
//! Results are keyed by suite title and kept in first-seen order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::event::SuiteEnded;

/// Aggregated counters of one suite
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub title: String,
    pub duration_ms: u64,
    pub tests: u64,
    pub passes: u64,
    pub failures: u64,
    pub pending: u64,
}

impl SuiteResult {
    /// Build a result from a `suiteEnd` payload and the carried duration
    pub fn from_suite_end(title: impl Into<String>, end: &SuiteEnded, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            duration_ms,
            tests: end.tests,
            passes: end.passes,
            failures: end.failures,
            pending: end.pending,
        }
    }
}

/// Insertion-ordered mapping of suite title to result
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuiteMap {
    entries: Vec<SuiteResult>,
    index: HashMap<String, usize>,
}

impl SuiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result; an existing title is overwritten in place
    pub fn insert(&mut self, result: SuiteResult) {
        match self.index.get(&result.title) {
            Some(&i) => self.entries[i] = result,
            None => {
                self.index.insert(result.title.clone(), self.entries.len());
                self.entries.push(result);
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&SuiteResult> {
        self.index.get(title).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuiteResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all suite durations
    pub fn total_duration_ms(&self) -> u64 {
        self.entries.iter().map(|s| s.duration_ms).sum()
    }

    /// Fold another map into this one, later entries winning
    pub fn extend(&mut self, other: SuiteMap) {
        for result in other.entries {
            self.insert(result);
        }
    }
}

impl IntoIterator for SuiteMap {
    type Item = SuiteResult;
    type IntoIter = std::vec::IntoIter<SuiteResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Run-wide totals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Wall clock of the whole run
    pub total_duration_ms: u64,
    /// Sum of suite durations per worker, by bucket index
    pub worker_durations_ms: Vec<u64>,
    pub total_tests: u64,
    pub total_passes: u64,
    pub total_failures: u64,
    pub total_pending: u64,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.total_failures > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(title: &str, duration_ms: u64) -> SuiteResult {
        SuiteResult {
            title: title.to_string(),
            duration_ms,
            tests: 1,
            passes: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut map = SuiteMap::new();
        map.insert(suite("b", 1));
        map.insert(suite("a", 2));
        map.insert(suite("b", 5));

        let titles: Vec<_> = map.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(map.get("b").unwrap().duration_ms, 5);
        assert_eq!(map.total_duration_ms(), 7);
    }

    #[test]
    fn test_extend_last_write_wins() {
        let mut first = SuiteMap::new();
        first.insert(suite("shared", 10));
        first.insert(suite("one", 1));

        let mut second = SuiteMap::new();
        second.insert(suite("two", 2));
        second.insert(suite("shared", 20));

        first.extend(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.get("shared").unwrap().duration_ms, 20);
    }
}
