// src/exec/backend.rs

//! Pluggable renderer backend abstraction.
//!
//! The supervisor talks to a `RendererBackend` instead of spawning processes
//! itself. Production uses [`ProcessBackend`]; tests can provide their own
//! implementation that records calls and returns scripted outcomes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::config::SupervisorConfig;
use crate::engine::CycleOutcome;
use crate::runlog::RunLog;

use super::command::{RendererCommand, run_renderer};

/// Trait abstracting how one renderer invocation happens.
pub trait RendererBackend: Send {
    /// Run the renderer to completion and report the outcome.
    ///
    /// Any output the renderer produces belongs in `log`.
    fn run<'a>(
        &'a mut self,
        log: &'a RunLog,
    ) -> Pin<Box<dyn Future<Output = CycleOutcome> + Send + 'a>>;
}

/// Real backend: launches the interpreter with the script as a child process.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: RendererCommand,
    timeout: Option<Duration>,
}

impl ProcessBackend {
    pub fn new(command: RendererCommand, timeout: Option<Duration>) -> Self {
        Self { command, timeout }
    }

    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self::new(config.renderer_command(), config.timeout)
    }
}

impl RendererBackend for ProcessBackend {
    fn run<'a>(
        &'a mut self,
        log: &'a RunLog,
    ) -> Pin<Box<dyn Future<Output = CycleOutcome> + Send + 'a>> {
        Box::pin(run_renderer(&self.command, log, self.timeout))
    }
}
