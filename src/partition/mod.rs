//! Bucket partitioning
//!
//! Greedy "longest processing time first" packing: specs are taken heaviest
//! first and each goes to the currently lightest bucket.

#![allow(dead_code)]

use tracing::{debug, info};

use crate::models::{Bucket, WeightedSpec};

/// Bucket count actually used for a run
///
/// When more threads are requested than there are specs the count is halved
/// once. The result may still exceed the spec count.
pub fn effective_threads(requested: usize, spec_count: usize) -> usize {
    if requested > spec_count {
        requested / 2
    } else {
        requested
    }
}

/// LPT bucket packer
#[derive(Clone, Copy, Debug)]
pub struct Partitioner {
    buckets: usize,
}

impl Partitioner {
    pub fn new(buckets: usize) -> Self {
        Self { buckets }
    }

    /// Partitioner for a requested thread count, applying the halving rule
    pub fn for_specs(requested: usize, spec_count: usize) -> Self {
        let buckets = effective_threads(requested, spec_count);
        if buckets != requested {
            info!(
                "Reducing threads from {} to {} for {} specs",
                requested, buckets, spec_count
            );
        }
        Self::new(buckets)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets
    }

    /// Distribute specs over the buckets
    ///
    /// Ties between equally light buckets go to the one that has waited
    /// longest for a spec, then to the lowest index.
    pub fn partition(&self, mut specs: Vec<WeightedSpec>) -> Vec<Bucket> {
        // Specs always need somewhere to go
        let count = if specs.is_empty() {
            self.buckets
        } else {
            self.buckets.max(1)
        };

        let mut buckets: Vec<Bucket> = (0..count).map(Bucket::new).collect();
        let mut last_assigned: Vec<Option<usize>> = vec![None; count];

        specs.sort_by(|a, b| b.weight.cmp(&a.weight));

        for (seq, weighted) in specs.into_iter().enumerate() {
            let target = (0..count)
                .min_by_key(|&i| (buckets[i].weight, last_assigned[i].map_or(0, |s| s + 1), i))
                .unwrap_or(0);

            debug!(
                "Assigning {} (weight {}) to bucket {}",
                weighted.spec, weighted.weight, target
            );
            buckets[target].push(weighted.spec, weighted.weight);
            last_assigned[target] = Some(seq);
        }

        buckets
    }
}
