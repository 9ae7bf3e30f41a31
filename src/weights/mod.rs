//! Spec weights
//!
//! Loading, assigning, and recomputing the per-spec weights used to
//! balance buckets.

mod assign;
mod recompute;
pub mod store;

pub use assign::WeightAssigner;
pub use recompute::recompute;
pub use store::{WeightStore, WeightTable, DEFAULT_WEIGHTS_FILE};
