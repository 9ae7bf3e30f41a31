//! Output formatting module
//!
//! Live progress lines and the final report.

mod formatter;
mod live;

pub use formatter::{OutputFormat, ReportFormatter};
pub use live::LiveReporter;
