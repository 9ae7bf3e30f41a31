//! Data models for parallel spec runs
//!
//! This module contains all data structures used throughout the application.

#![allow(dead_code)]

pub mod event;
mod spec;
mod suite;

pub(crate) use event::millis;
pub use event::TestEvent;
pub use spec::{Bucket, SpecPath, Weight, WeightedSpec};
pub use suite::{RunSummary, SuiteMap, SuiteResult};
