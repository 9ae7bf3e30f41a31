//! Output formatters for run reports
//!
//! Provides Table, JSON, and CSV output formats.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Bucket, SuiteResult};
use crate::results::RunReport;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

/// Human readable duration: seconds, minutes, hours, or days
///
/// Unit boundaries are checked on the value as printed, so 59 999 ms is
/// `1.0 Min` rather than `60.0 Sec`.
pub fn format_time(millis: u64) -> String {
    let seconds = millis as f64 / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    if one_decimal(seconds) < 60.0 {
        format!("{seconds:.1} Sec")
    } else if one_decimal(minutes) < 60.0 {
        format!("{minutes:.1} Min")
    } else if one_decimal(hours) < 24.0 {
        format!("{hours:.1} Hrs")
    } else {
        format!("{days:.1} Days")
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

const TOTAL_LABEL: &str = "Total Run Time and Final Results";
const HEADERS: [&str; 6] = ["Spec", "Time", "Tests", "Passing", "Failing", "Pending"];
const WIDTHS: [usize; 6] = [45, 25, 7, 9, 9, 9];

#[derive(Serialize)]
struct CsvRow<'a> {
    spec: &'a str,
    time_ms: u64,
    tests: u64,
    passing: u64,
    failing: u64,
    pending: u64,
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format the final report
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_table(report)),
            OutputFormat::Json => {
                serde_json::to_string(report).context("Failed to serialize report")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
            OutputFormat::Csv => self.format_csv(report),
        }
    }

    fn border(left: &str, mid: &str, right: &str) -> String {
        let segments: Vec<String> = WIDTHS.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}\n", segments.join(mid))
    }

    fn row(cells: [String; 6]) -> String {
        let mut line = String::from("│");
        for (cell, width) in cells.iter().zip(WIDTHS) {
            line.push_str(&format!(" {:<width$} │", truncate(cell, width)));
        }
        line.push('\n');
        line
    }

    fn suite_cells(suite: &SuiteResult) -> [String; 6] {
        [
            suite.title.clone(),
            format_time(suite.duration_ms),
            suite.tests.to_string(),
            suite.passes.to_string(),
            suite.failures.to_string(),
            suite.pending.to_string(),
        ]
    }

    fn format_table(&self, report: &RunReport) -> String {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str(&Self::border("┌", "┬", "┐"));
        let header = Self::row(HEADERS.map(String::from));
        if self.colorize {
            output.push_str(&format!("\x1b[32m{}\x1b[0m", header.trim_end()));
            output.push('\n');
        } else {
            output.push_str(&header);
        }
        output.push_str(&Self::border("├", "┼", "┤"));

        for suite in &report.suites {
            output.push_str(&Self::row(Self::suite_cells(suite)));
        }

        if !report.suites.is_empty() {
            output.push_str(&Self::border("├", "┼", "┤"));
        }
        output.push_str(&Self::row([
            TOTAL_LABEL.to_string(),
            format_time(summary.total_duration_ms),
            summary.total_tests.to_string(),
            summary.total_passes.to_string(),
            summary.total_failures.to_string(),
            summary.total_pending.to_string(),
        ]));
        output.push_str(&Self::border("└", "┴", "┘"));

        output
    }

    fn format_csv(&self, report: &RunReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for suite in &report.suites {
            writer
                .serialize(CsvRow {
                    spec: &suite.title,
                    time_ms: suite.duration_ms,
                    tests: suite.tests,
                    passing: suite.passes,
                    failing: suite.failures,
                    pending: suite.pending,
                })
                .context("Failed to write CSV row")?;
        }

        let summary = &report.summary;
        writer
            .serialize(CsvRow {
                spec: TOTAL_LABEL,
                time_ms: summary.total_duration_ms,
                tests: summary.total_tests,
                passing: summary.total_passes,
                failing: summary.total_failures,
                pending: summary.total_pending,
            })
            .context("Failed to write CSV row")?;

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }

    /// Format the bucket plan of a run
    pub fn format_plan(&self, buckets: &[Bucket], mut command_for: impl FnMut(&Bucket) -> String) -> String {
        let mut output = String::new();
        for bucket in buckets {
            output.push_str(&format!(
                "Thread {}: {} specs, weight {}\n",
                bucket.index,
                bucket.len(),
                bucket.weight
            ));
            for spec in &bucket.specs {
                output.push_str(&format!("  - {spec}\n"));
            }
            output.push_str(&format!("  $ {}\n", command_for(bucket)));
        }
        output
    }
}

/// Shorten a cell to `width` characters
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
