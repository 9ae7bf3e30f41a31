//! Spec execution engine
//!
//! Runs spec buckets in parallel worker processes and collects their
//! streamed results.

#![allow(dead_code)]

mod command;
mod parallel;
mod runner;
mod stream;
mod worker;

pub use command::{PackageManager, DEFAULT_REPORTER};
pub use runner::SpecRunner;
