// src/engine/cycle.rs

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::{as_millis_u64, format_duration};

/// Result of one renderer invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Success,
    /// Non-zero exit status. Launch failures and signal termination use -1.
    Failed(i32),
    /// Killed after exceeding the configured timeout.
    TimedOut(Duration),
}

impl CycleOutcome {
    /// Map a process exit code onto an outcome; `None` means no code was
    /// available (killed by a signal).
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => CycleOutcome::Success,
            Some(code) => CycleOutcome::Failed(code),
            None => CycleOutcome::Failed(-1),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Success)
    }

    /// `OK` or `ERROR`.
    pub fn tag(&self) -> &'static str {
        if self.is_success() { "OK" } else { "ERROR" }
    }

    /// The outcome line body, without the timestamp prefix.
    pub fn log_line(&self) -> String {
        match self {
            CycleOutcome::Success => "Renderer finished OK".to_string(),
            CycleOutcome::Failed(code) => format!("Renderer exited with error {code}"),
            CycleOutcome::TimedOut(limit) => format!(
                "Renderer exited with error timeout after {}",
                format_duration(*limit)
            ),
        }
    }
}

/// One loop iteration, as reported once the renderer has finished.
#[derive(Debug, Clone)]
pub struct CycleRecord {
    /// 1-based cycle counter for this supervisor lifetime.
    pub cycle: u64,
    pub finished_at: DateTime<Local>,
    pub outcome: CycleOutcome,
    /// How long the renderer ran.
    pub elapsed: Duration,
}

impl CycleRecord {
    pub fn new(cycle: u64, outcome: CycleOutcome, elapsed: Duration) -> Self {
        Self {
            cycle,
            finished_at: Local::now(),
            outcome,
            elapsed,
        }
    }

    /// Emit the record as a structured `tracing` event.
    pub fn emit(&self) {
        let elapsed_ms = as_millis_u64(self.elapsed);
        let finished_at = self.finished_at.to_rfc3339();
        match self.outcome {
            CycleOutcome::Success => info!(
                cycle = self.cycle,
                outcome = self.outcome.tag(),
                exit_code = 0,
                elapsed_ms,
                %finished_at,
                "renderer finished"
            ),
            CycleOutcome::Failed(code) => warn!(
                cycle = self.cycle,
                outcome = self.outcome.tag(),
                exit_code = code,
                elapsed_ms,
                %finished_at,
                "renderer failed"
            ),
            CycleOutcome::TimedOut(limit) => warn!(
                cycle = self.cycle,
                outcome = self.outcome.tag(),
                timeout_ms = as_millis_u64(limit),
                elapsed_ms,
                %finished_at,
                "renderer timed out"
            ),
        }
    }
}
