//! Live console output
//!
//! Prints test lines as workers stream them. Every worker gets a display
//! color picked from a fixed palette by `index mod palette size`.

#![allow(dead_code)]

use crate::models::TestEvent;

use super::formatter::format_time;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Worker display colors
pub const PALETTE: &[&str] = &[
    "\x1b[32m", "\x1b[36m", "\x1b[35m", "\x1b[33m", "\x1b[37m", "\x1b[34m", "\x1b[96m", "\x1b[93m",
];

/// Color for a worker index
pub fn worker_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Streams worker progress to the terminal
#[derive(Clone, Debug)]
pub struct LiveReporter {
    colorize: bool,
    enabled: bool,
}

impl LiveReporter {
    pub fn new() -> Self {
        Self {
            colorize: true,
            enabled: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Reporter that prints nothing
    pub fn silent() -> Self {
        Self {
            colorize: false,
            enabled: false,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn tag(&self, worker: usize) -> String {
        self.paint(worker_color(worker), &format!("[{worker}]"))
    }

    /// Lines printed for one event
    pub fn format_event(&self, worker: usize, event: &TestEvent) -> Vec<String> {
        match event {
            TestEvent::Pass(p) => vec![format!(
                "{} {} {} ({}ms)",
                self.tag(worker),
                self.paint(GREEN, "✔"),
                p.title,
                p.duration
            )],
            TestEvent::Fail(f) => {
                let mut lines = vec![format!(
                    "{} {} {} ({}ms)",
                    self.tag(worker),
                    self.paint(RED, "✖"),
                    f.title,
                    f.duration
                )];
                for detail in [&f.err, &f.stack].into_iter().flatten() {
                    lines.push(self.paint(RED, detail));
                }
                lines
            }
            TestEvent::SuiteEnd(_) => Vec::new(),
        }
    }

    pub fn event(&self, worker: usize, event: &TestEvent) {
        if !self.enabled {
            return;
        }
        for line in self.format_event(worker, event) {
            println!("{line}");
        }
    }

    /// Forward a worker's stderr line
    pub fn stderr_line(&self, worker: usize, line: &str) {
        if self.enabled {
            eprintln!("{} {}", self.tag(worker), self.paint(RED, line));
        }
    }

    pub fn format_worker_time(&self, worker: usize, duration_ms: u64) -> String {
        format!("{} Thread {} time: {}", self.tag(worker), worker, format_time(duration_ms))
    }

    /// Summary line once a worker has exited
    pub fn worker_finished(&self, worker: usize, duration_ms: u64) {
        if self.enabled {
            println!("{}", self.format_worker_time(worker, duration_ms));
        }
    }
}

impl Default for LiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{SuiteEnded, TestFailed, TestPassed};

    #[test]
    fn test_palette_wraps() {
        assert_eq!(worker_color(0), worker_color(PALETTE.len()));
        assert_eq!(worker_color(3), worker_color(3 + 2 * PALETTE.len()));
    }

    #[test]
    fn test_format_pass_plain() {
        let reporter = LiveReporter::new().no_color();
        let lines = reporter.format_event(
            2,
            &TestEvent::Pass(TestPassed {
                title: "adds item".to_string(),
                duration: 81,
            }),
        );
        assert_eq!(lines, vec!["[2] ✔ adds item (81ms)"]);
    }

    #[test]
    fn test_format_fail_includes_details() {
        let reporter = LiveReporter::new().no_color();
        let lines = reporter.format_event(
            0,
            &TestEvent::Fail(TestFailed {
                title: "pays".to_string(),
                duration: 9,
                err: Some("AssertionError".to_string()),
                stack: None,
            }),
        );
        assert_eq!(lines, vec!["[0] ✖ pays (9ms)", "AssertionError"]);
    }

    #[test]
    fn test_suite_end_prints_nothing() {
        let reporter = LiveReporter::new();
        assert!(reporter
            .format_event(0, &TestEvent::SuiteEnd(SuiteEnded::default()))
            .is_empty());
    }

    #[test]
    fn test_colored_tag() {
        let reporter = LiveReporter::new();
        let line = reporter.format_worker_time(1, 1500);
        assert!(line.starts_with(worker_color(1)));
        assert!(line.ends_with("Thread 1 time: 1.5 Sec"));
    }
}
