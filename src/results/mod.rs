//! Run results
//!
//! Aggregation of worker results and the final run report.

mod aggregate;
mod report;

pub use aggregate::ResultAggregator;
pub use report::RunReport;
