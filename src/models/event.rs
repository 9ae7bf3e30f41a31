//! Worker event protocol
//!
//! Each line a worker writes to stdout is a JSON array `[kind, payload]`.
//! Only `pass`, `fail` and `suiteEnd` are meaningful; everything else is
//! rejected with an [`EventError`] and dropped by the caller.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Event decoding errors
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Empty line")]
    Empty,

    #[error("Malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown event kind: {0}")]
    UnknownKind(String),
}

/// A passing test
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TestPassed {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "millis")]
    pub duration: u64,
}

/// A failing test
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TestFailed {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "millis")]
    pub duration: u64,
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

/// End of a suite with its counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SuiteEnded {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tests: u64,
    #[serde(default)]
    pub passes: u64,
    #[serde(default)]
    pub failures: u64,
    #[serde(default)]
    pub pending: u64,
}

/// A decoded worker event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestEvent {
    Pass(TestPassed),
    Fail(TestFailed),
    SuiteEnd(SuiteEnded),
}

impl TestEvent {
    /// Decode one stdout line
    pub fn parse(line: &str) -> Result<Self, EventError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(EventError::Empty);
        }

        let (kind, payload): (String, serde_json::Value) = serde_json::from_str(line)?;

        match kind.as_str() {
            "pass" => Ok(TestEvent::Pass(serde_json::from_value(payload)?)),
            "fail" => Ok(TestEvent::Fail(serde_json::from_value(payload)?)),
            "suiteEnd" => Ok(TestEvent::SuiteEnd(serde_json::from_value(payload)?)),
            _ => Err(EventError::UnknownKind(kind)),
        }
    }

    /// Duration carried by the event, if any
    pub fn duration(&self) -> Option<u64> {
        match self {
            TestEvent::Pass(p) => Some(p.duration),
            TestEvent::Fail(f) => Some(f.duration),
            TestEvent::SuiteEnd(_) => None,
        }
    }
}

/// Accept any JSON number (or null) as whole milliseconds
pub(crate) fn millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    })
}
