#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tracing_subscriber::{EnvFilter, fmt};

use renderloop::engine::CycleOutcome;
use renderloop::exec::RendererBackend;
use renderloop::runlog::RunLog;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Start/finish instants of one fake renderer run.
#[derive(Debug, Clone, Copy)]
pub struct FakeCall {
    pub started: Instant,
    pub finished: Instant,
}

/// A fake renderer that:
/// - returns scripted outcomes in order (then `Success` once they run out)
/// - optionally writes a line of "output" into the run log
/// - optionally takes some time to "render"
/// - records when each run started and finished
pub struct FakeRenderer {
    outcomes: VecDeque<CycleOutcome>,
    output: Option<String>,
    run_for: Duration,
    started: Option<Arc<Notify>>,
    calls: Arc<Mutex<Vec<FakeCall>>>,
}

impl FakeRenderer {
    pub fn new(outcomes: Vec<CycleOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            output: None,
            run_for: Duration::ZERO,
            started: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_output(mut self, line: &str) -> Self {
        self.output = Some(line.to_string());
        self
    }

    pub fn running_for(mut self, d: Duration) -> Self {
        self.run_for = d;
        self
    }

    pub fn notify_on_start(mut self, notify: Arc<Notify>) -> Self {
        self.started = Some(notify);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<FakeCall>>> {
        Arc::clone(&self.calls)
    }
}

impl RendererBackend for FakeRenderer {
    fn run<'a>(
        &'a mut self,
        log: &'a RunLog,
    ) -> Pin<Box<dyn Future<Output = CycleOutcome> + Send + 'a>> {
        Box::pin(async move {
            let started = Instant::now();
            if let Some(ref notify) = self.started {
                notify.notify_one();
            }
            if let Some(ref line) = self.output {
                log.write_raw(line).expect("fake renderer writing output");
            }
            if !self.run_for.is_zero() {
                tokio::time::sleep(self.run_for).await;
            }

            let outcome = self.outcomes.pop_front().unwrap_or(CycleOutcome::Success);
            self.calls.lock().unwrap().push(FakeCall {
                started,
                finished: Instant::now(),
            });
            outcome
        })
    }
}

pub fn read_log(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("reading run log")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Drop the `[<timestamp>] ` prefix of a status line, if present.
pub fn message(line: &str) -> &str {
    match (line.starts_with('['), line.find("] ")) {
        (true, Some(idx)) => &line[idx + 2..],
        _ => line,
    }
}

/// Status-line messages only (lines carrying a timestamp).
pub fn stamped_messages(path: &Path) -> Vec<String> {
    read_log(path)
        .iter()
        .filter(|l| l.starts_with('['))
        .map(|l| message(l).to_string())
        .collect()
}

pub fn count(lines: &[String], needle: &str) -> usize {
    lines.iter().filter(|l| l.as_str() == needle).count()
}
