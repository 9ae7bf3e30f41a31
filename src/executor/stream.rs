//! Worker event stream
//!
//! Folds one worker's stdout, line by line, into its suite results.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

use crate::models::{SuiteMap, SuiteResult, TestEvent};

/// Per-worker stream state
#[derive(Debug, Default)]
pub struct EventStream {
    suites: SuiteMap,
    last_duration: u64,
    dropped: usize,
}

impl EventStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and apply one line; undecodable lines are dropped
    pub fn feed_line(&mut self, line: &str) -> Option<TestEvent> {
        match TestEvent::parse(line) {
            Ok(event) => {
                self.apply(&event);
                Some(event)
            }
            Err(e) => {
                trace!("Dropping worker output line: {}", e);
                self.dropped += 1;
                None
            }
        }
    }

    /// Apply an event
    ///
    /// `suiteEnd` carries no duration of its own: it takes the duration of
    /// the last `pass` or `fail` seen on this stream.
    pub fn apply(&mut self, event: &TestEvent) {
        match event {
            TestEvent::Pass(p) => self.last_duration = p.duration,
            TestEvent::Fail(f) => self.last_duration = f.duration,
            TestEvent::SuiteEnd(end) => {
                if let Some(title) = &end.title {
                    self.suites
                        .insert(SuiteResult::from_suite_end(title, end, self.last_duration));
                }
            }
        }
    }

    pub fn suites(&self) -> &SuiteMap {
        &self.suites
    }

    /// Number of lines that were not valid events
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> SuiteMap {
        self.suites
    }
}

/// Read a stream to the end, folding each decoded event into `stream`
///
/// Lines are split on `\n` and decoded lossily, so stray non-UTF-8 output
/// only costs the line it appears on. Events folded before a read error stay
/// in `stream`.
pub async fn read_events<R, F>(
    mut reader: R,
    stream: &mut EventStream,
    mut on_event: F,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&TestEvent),
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        if let Some(event) = stream.feed_line(&line) {
            on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_duration_carry_over() {
        let mut stream = EventStream::new();
        stream.feed_line(r#"["pass",{"title":"A","duration":100}]"#);
        stream.feed_line(r#"["suiteEnd",{"title":"A","tests":1,"passes":1}]"#);

        let suites = stream.finish();
        let a = suites.get("A").unwrap();
        assert_eq!(a.duration_ms, 100);
        assert_eq!(a.tests, 1);
        assert_eq!(a.passes, 1);
    }

    #[test]
    fn test_last_duration_wins() {
        let mut stream = EventStream::new();
        stream.feed_line(r#"["pass",{"title":"one","duration":10}]"#);
        stream.feed_line(r#"["fail",{"title":"two","duration":250,"err":"boom"}]"#);
        stream.feed_line(r#"["suiteEnd",{"title":"S","tests":2,"passes":1,"failures":1}]"#);

        assert_eq!(stream.suites().get("S").unwrap().duration_ms, 250);
    }

    #[test]
    fn test_suite_end_without_test_has_zero_duration() {
        let mut stream = EventStream::new();
        stream.feed_line(r#"["suiteEnd",{"title":"Empty","tests":0,"pending":2}]"#);

        let s = stream.finish();
        assert_eq!(s.get("Empty").unwrap().duration_ms, 0);
        assert_eq!(s.get("Empty").unwrap().pending, 2);
    }

    #[test]
    fn test_untitled_suite_end_is_ignored() {
        let mut stream = EventStream::new();
        stream.feed_line(r#"["pass",{"title":"x","duration":5}]"#);
        assert!(stream
            .feed_line(r#"["suiteEnd",{"title":null,"tests":9}]"#)
            .is_some());
        assert!(stream.suites().is_empty());
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let mut stream = EventStream::new();
        assert!(stream.feed_line("Opening Cypress...").is_none());
        assert!(stream.feed_line(r#"["pass",{"title":"#).is_none());
        assert!(stream.feed_line(r#"["end",{}]"#).is_none());
        assert_eq!(stream.dropped(), 3);
        assert!(stream.suites().is_empty());
    }

    #[tokio::test]
    async fn test_read_events_from_mock_io() {
        let mock = tokio_test::io::Builder::new()
            .read(b"[\"pass\",{\"title\":\"a\",\"duration\":40}]\n[\"suiteEnd\",{\"ti")
            .read(b"tle\":\"Suite A\",\"tests\":1,\"passes\":1}]\nnot json\n")
            .read(b"[\"fail\",{\"title\":\"b\",\"duration\":70}]\n")
            .read(b"[\"suiteEnd\",{\"title\":\"Suite B\",\"tests\":1,\"failures\":1}]")
            .build();

        let mut seen = Vec::new();
        let mut stream = EventStream::new();
        read_events(BufReader::new(mock), &mut stream, |e| seen.push(e.clone()))
            .await
            .unwrap();

        assert_eq!(seen.len(), 4);
        assert_eq!(stream.dropped(), 1);

        let suites = stream.finish();
        let titles: Vec<_> = suites.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Suite A", "Suite B"]);
        assert_eq!(suites.get("Suite A").unwrap().duration_ms, 40);
        assert_eq!(suites.get("Suite B").unwrap().duration_ms, 70);
        assert_eq!(suites.get("Suite B").unwrap().failures, 1);
    }

    #[tokio::test]
    async fn test_read_events_invalid_utf8_only_costs_its_line() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(b"[\"suiteEnd\",{\"title\":\"ok\",\"tests\":1}]\n");

        let mut stream = EventStream::new();
        read_events(BufReader::new(&input[..]), &mut stream, |_| {})
            .await
            .unwrap();
        assert_eq!(stream.dropped(), 1);
        assert!(stream.suites().get("ok").is_some());
    }

    #[tokio::test]
    async fn test_read_error_keeps_folded_events() {
        let mock = tokio_test::io::Builder::new()
            .read(b"[\"pass\",{\"title\":\"a\",\"duration\":30}]\n")
            .read(b"[\"suiteEnd\",{\"title\":\"Kept\",\"tests\":1,\"passes\":1}]\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
            .build();

        let mut stream = EventStream::new();
        let result = read_events(BufReader::new(mock), &mut stream, |_| {}).await;

        assert!(result.is_err());
        assert_eq!(stream.suites().get("Kept").unwrap().duration_ms, 30);
    }
}
