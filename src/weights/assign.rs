//! Weight assignment
//!
//! Resolves a weight for every discovered spec from the persisted table,
//! falling back to a small random weight for specs never seen before.

use rand::Rng;
use tracing::debug;

use super::store::WeightTable;
use crate::models::{SpecPath, Weight, WeightedSpec};

/// Fallback weights are drawn from `[0, FALLBACK_WEIGHT_BOUND)`
pub const FALLBACK_WEIGHT_BOUND: Weight = 3;

/// Assigns weights from a persisted table
pub struct WeightAssigner<'a> {
    table: &'a WeightTable,
}

impl<'a> WeightAssigner<'a> {
    pub fn new(table: &'a WeightTable) -> Self {
        Self { table }
    }

    /// Weight of the first record whose key is a suffix of the spec path
    pub fn resolve(&self, spec: &SpecPath) -> Option<Weight> {
        self.table
            .iter()
            .find(|(key, _)| spec.matches_key(key))
            .map(|(_, record)| record.weight)
    }

    /// Weight every spec, keeping discovery order
    pub fn assign<R: Rng>(&self, specs: &[SpecPath], rng: &mut R) -> Vec<WeightedSpec> {
        let weighted: Vec<WeightedSpec> = specs
            .iter()
            .map(|spec| match self.resolve(spec) {
                Some(weight) => WeightedSpec::new(spec.clone(), weight).known(),
                None => WeightedSpec::new(spec.clone(), rng.random_range(0..FALLBACK_WEIGHT_BOUND)),
            })
            .collect();

        debug!(
            "Resolved {}/{} spec weights from history",
            weighted.iter().filter(|w| w.known).count(),
            weighted.len()
        );

        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::store::WeightRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec(path: &str) -> SpecPath {
        SpecPath::new("cypress/integration", path)
    }

    #[test]
    fn test_suffix_match_uses_record_weight() {
        let mut table = WeightTable::new();
        table.insert("login.spec.js".to_string(), WeightRecord::new(900, 17));

        let assigner = WeightAssigner::new(&table);
        let mut rng = StdRng::seed_from_u64(7);
        let weighted = assigner.assign(&[spec("cypress/integration/auth/login.spec.js")], &mut rng);

        assert_eq!(weighted[0].weight, 17);
        assert!(weighted[0].known);
    }

    #[test]
    fn test_unmatched_specs_get_fallback_range() {
        let mut table = WeightTable::new();
        table.insert("other.spec.js".to_string(), WeightRecord::new(900, 40));

        let specs: Vec<_> = (0..200)
            .map(|i| spec(&format!("cypress/integration/s{i}.spec.js")))
            .collect();

        let assigner = WeightAssigner::new(&table);
        let mut rng = StdRng::seed_from_u64(42);
        let weighted = assigner.assign(&specs, &mut rng);

        assert_eq!(weighted.len(), specs.len());
        assert!(weighted.iter().all(|w| w.weight < FALLBACK_WEIGHT_BOUND));
        assert!(weighted.iter().all(|w| !w.known));
        let order: Vec<_> = weighted.iter().map(|w| w.spec.clone()).collect();
        assert_eq!(order, specs);
    }

    #[test]
    fn test_overlapping_suffixes_first_key_wins() {
        // "a/login.spec.js" sorts before "login.spec.js"
        let mut table = WeightTable::new();
        table.insert("login.spec.js".to_string(), WeightRecord::new(10, 1));
        table.insert("a/login.spec.js".to_string(), WeightRecord::new(10, 9));

        let assigner = WeightAssigner::new(&table);
        assert_eq!(
            assigner.resolve(&spec("cypress/integration/a/login.spec.js")),
            Some(9)
        );
        assert_eq!(
            assigner.resolve(&spec("cypress/integration/b/login.spec.js")),
            Some(1)
        );
    }

    #[test]
    fn test_zero_weight_record_is_kept() {
        let mut table = WeightTable::new();
        table.insert("fast.spec.js".to_string(), WeightRecord::new(0, 0));

        let assigner = WeightAssigner::new(&table);
        assert_eq!(assigner.resolve(&spec("cypress/integration/fast.spec.js")), Some(0));
    }
}
