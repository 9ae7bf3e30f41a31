//! Weight recomputation
//!
//! Turns this run's suite durations into the weight table for the next run.

use super::store::{WeightRecord, WeightTable};
use crate::models::{SuiteMap, Weight};

/// Weight budget per observed suite
pub const WEIGHT_PER_SUITE: u64 = 10;

/// `floor(duration / total * WEIGHT_PER_SUITE * suites)` for every suite
pub fn recompute(suites: &SuiteMap) -> WeightTable {
    let total = suites.total_duration_ms();
    let budget = WEIGHT_PER_SUITE * suites.len() as u64;

    suites
        .iter()
        .map(|suite| {
            let record = WeightRecord::new(
                suite.duration_ms,
                normalize(suite.duration_ms, total, budget),
            );
            (suite.title.clone(), record)
        })
        .collect()
}

fn normalize(duration: u64, total: u64, budget: u64) -> Weight {
    if total == 0 {
        return 0;
    }
    (u128::from(duration) * u128::from(budget) / u128::from(total)) as Weight
}
