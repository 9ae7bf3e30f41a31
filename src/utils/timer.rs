//! Run phase timing
//!
//! Measures how long each phase of a run (planning, workers, aggregation)
//! took, on top of the wall clock used for the report total.

#![allow(dead_code)]

use std::time::{Duration, Instant};

/// Stopwatch that records one mark per finished phase
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    /// Phase label and the elapsed time when it ended
    marks: Vec<(&'static str, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: Vec::new(),
        }
    }

    /// Mark the end of a phase
    pub fn lap(&mut self, phase: &'static str) {
        self.marks.push((phase, self.start.elapsed()));
    }

    /// Wall clock since the stopwatch started
    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.total().as_millis() as u64
    }

    /// Duration of each phase on its own
    pub fn phases(&self) -> Vec<(&'static str, Duration)> {
        let mut prev = Duration::ZERO;
        self.marks
            .iter()
            .map(|&(phase, end)| {
                let took = end.saturating_sub(prev);
                prev = end;
                (phase, took)
            })
            .collect()
    }

    /// One-line summary, e.g. `plan 3ms, workers 4120ms (total 4125ms)`
    pub fn summary(&self) -> String {
        let phases = self
            .phases()
            .into_iter()
            .map(|(phase, took)| format!("{} {}ms", phase, took.as_millis()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} (total {}ms)", phases, self.elapsed_ms())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
