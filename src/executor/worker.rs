//! Worker processes
//!
//! One worker runs one bucket. Its stdout is folded into suite results
//! privately; nothing is shared with other workers until it has exited.

use anyhow::{Context, Result};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::command::WorkerCommand;
use super::stream::{read_events, EventStream};
use crate::models::{Bucket, SuiteMap};
use crate::output::LiveReporter;

/// How long output is still read after a worker has exited
const DRAIN_GRACE: Duration = Duration::from_millis(300);

/// What a worker left behind
#[derive(Debug)]
pub struct WorkerOutcome {
    pub index: usize,
    pub suites: SuiteMap,
    /// `None` when the worker never ran
    pub status: Option<ExitStatus>,
    pub elapsed_ms: u64,
}

impl WorkerOutcome {
    pub fn skipped(index: usize) -> Self {
        Self {
            index,
            suites: SuiteMap::new(),
            status: None,
            elapsed_ms: 0,
        }
    }
}

/// A bucket bound to its command
pub struct Worker {
    bucket: Bucket,
    command: Arc<WorkerCommand>,
    live: Arc<LiveReporter>,
}

impl Worker {
    pub fn new(bucket: Bucket, command: Arc<WorkerCommand>, live: Arc<LiveReporter>) -> Self {
        Self {
            bucket,
            command,
            live,
        }
    }

    /// Run to completion; a worker that cannot start yields no suites
    pub async fn run(self) -> WorkerOutcome {
        let index = self.bucket.index;
        match self.try_run().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Worker {} failed: {:#}", index, e);
                WorkerOutcome::skipped(index)
            }
        }
    }

    async fn try_run(self) -> Result<WorkerOutcome> {
        let index = self.bucket.index;
        let args = self.command.args_for(&self.bucket);
        let start = Instant::now();

        info!(
            "Starting worker {} with {} specs (weight {})",
            index,
            self.bucket.len(),
            self.bucket.weight
        );
        debug!("Worker {}: {} {}", index, self.command.program(), args.join(" "));

        let mut child = Command::new(self.command.program())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn `{}`", self.command.program()))?;

        let stdout = child.stdout.take().context("Worker stdout not captured")?;
        let stderr = child.stderr.take().context("Worker stderr not captured")?;

        let mut stderr_task = tokio::spawn(forward_stderr(stderr, index, self.live.clone()));

        let mut stream = EventStream::new();
        let (read_result, status) = {
            let live = self.live.clone();
            let read = read_events(BufReader::new(stdout), &mut stream, |event| {
                live.event(index, event)
            });
            tokio::pin!(read);

            let first = tokio::select! {
                result = &mut read => Finished::Output(result),
                status = child.wait() => Finished::Process(status),
            };

            match first {
                Finished::Output(result) => (Some(result), child.wait().await),
                // A descendant may still hold the pipe open; only what is
                // already buffered is read
                Finished::Process(status) => {
                    (timeout(DRAIN_GRACE, &mut read).await.ok(), status)
                }
            }
        };

        match read_result {
            Some(Ok(())) => {}
            Some(Err(e)) => warn!("Failed to read output of worker {}: {}", index, e),
            None => debug!("Worker {} output still open after exit, stopped reading", index),
        }

        match timeout(DRAIN_GRACE, &mut stderr_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Worker {} stderr forwarding stopped: {}", index, e),
            Err(_) => stderr_task.abort(),
        }

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to wait for worker {}: {}", index, e);
                return Ok(self.finish(stream, None, start));
            }
        };

        if !status.success() {
            warn!("Worker {} exited with {}", index, status);
        }
        Ok(self.finish(stream, Some(status), start))
    }

    fn finish(
        &self,
        stream: EventStream,
        status: Option<ExitStatus>,
        start: Instant,
    ) -> WorkerOutcome {
        let index = self.bucket.index;
        if stream.dropped() > 0 {
            debug!("Worker {} produced {} non-event lines", index, stream.dropped());
        }

        let suites = stream.finish();
        self.live.worker_finished(index, suites.total_duration_ms());

        WorkerOutcome {
            index,
            suites,
            status,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Whichever side of a worker finished first
enum Finished {
    Output(std::io::Result<()>),
    Process(std::io::Result<ExitStatus>),
}

async fn forward_stderr<R>(stderr: R, index: usize, live: Arc<LiveReporter>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => live.stderr_line(index, &line),
            Ok(None) => break,
            Err(e) => {
                debug!("Worker {} stderr unreadable: {}", index, e);
                break;
            }
        }
    }
}
