// src/engine/supervisor.rs

use std::io;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{SupervisorConfig, format_duration, validate_config};
use crate::engine::cycle::CycleRecord;
use crate::errors::Result;
use crate::exec::RendererBackend;
use crate::runlog::RunLog;

/// Receiving side of the shutdown flag. `true` means stop.
pub type ShutdownSignal = watch::Receiver<bool>;

/// Create a shutdown flag, initially unset.
pub fn shutdown_channel() -> (watch::Sender<bool>, ShutdownSignal) {
    watch::channel(false)
}

/// Options that influence how long the loop runs.
#[derive(Debug, Clone, Default)]
pub struct SupervisorOptions {
    /// Stop after this many cycles. `None` loops until shutdown.
    pub max_cycles: Option<u64>,
}

/// The render loop.
///
/// Responsibilities:
/// - Write the startup header to the run log, once.
/// - Per cycle: log "running", invoke the renderer through the backend, log
///   the outcome, then sleep for the configured interval.
/// - Stop only on shutdown or when `max_cycles` is reached.
///
/// Renderer failures never end the loop. Cycles never overlap: the backend is
/// awaited before anything else happens.
pub struct Supervisor<B: RendererBackend> {
    config: SupervisorConfig,
    options: SupervisorOptions,
    log: RunLog,
    backend: B,
    shutdown: ShutdownSignal,
}

impl<B: RendererBackend> Supervisor<B> {
    /// Validate the config and open the run log.
    ///
    /// An unopenable log is a startup error; nothing else here can fail.
    pub fn new(
        config: SupervisorConfig,
        backend: B,
        options: SupervisorOptions,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        validate_config(&config)?;
        let log = RunLog::open(&config.log)?;
        Ok(Self {
            config,
            options,
            log,
            backend,
            shutdown,
        })
    }

    /// Main loop. Returns the number of cycles that ran.
    pub async fn run(mut self) -> Result<u64> {
        info!(
            interpreter = %self.config.interpreter.display(),
            script = %self.config.script.display(),
            log = %self.log.path().display(),
            interval = %format_duration(self.config.interval),
            "render loop started"
        );

        // The first write doubles as the startup check that the log is writable.
        self.log
            .write_header(&self.config.interpreter, &self.config.script)?;

        let mut cycle: u64 = 0;
        loop {
            if self.shutdown_requested() {
                info!("shutdown requested, stopping before next cycle");
                break;
            }

            cycle += 1;
            let record = self.run_cycle(cycle).await;
            record.emit();

            if self.options.max_cycles.is_some_and(|max| cycle >= max) {
                info!(cycles = cycle, "cycle limit reached");
                break;
            }

            if !self.wait_interval().await {
                info!("shutdown requested during wait");
                break;
            }
        }

        self.append("stopped marker", |log| log.write_stopped());
        info!(cycles = cycle, "render loop exiting");
        Ok(cycle)
    }

    async fn run_cycle(&mut self, cycle: u64) -> CycleRecord {
        self.append("running line", |log| log.write_running());
        debug!(cycle, "running renderer");

        let started = Instant::now();
        let outcome = self.backend.run(&self.log).await;
        let elapsed = started.elapsed();

        self.append("outcome line", |log| log.write_outcome(&outcome));

        if outcome.is_success() {
            self.check_expected_output();
        }

        CycleRecord::new(cycle, outcome, elapsed)
    }

    /// Sleep for the interval. Returns `false` if shutdown cut the wait short.
    async fn wait_interval(&mut self) -> bool {
        let interval = self.config.interval;
        debug!(interval = %format_duration(interval), "waiting before next cycle");

        tokio::select! {
            _ = tokio::time::sleep(interval) => true,
            _ = wait_for_shutdown(&mut self.shutdown) => false,
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn check_expected_output(&self) {
        let Some(ref expected) = self.config.expect_output else {
            return;
        };

        let path = match (&self.config.working_dir, expected.is_relative()) {
            (Some(dir), true) => dir.join(expected),
            _ => expected.clone(),
        };

        if !path.exists() {
            warn!(path = %path.display(), "renderer succeeded but expected output is missing");
            self.append("missing output warning", |log| {
                log.write_stamped(&format!(
                    "WARNING: expected output {} was not produced",
                    path.display()
                ))
            });
        }
    }

    // Status-line write failures are reported but never stop the loop.
    fn append(&self, what: &str, write: impl FnOnce(&RunLog) -> io::Result<()>) {
        if let Err(e) = write(&self.log) {
            error!(
                log = %self.log.path().display(),
                error = %e,
                "failed to append {what} to run log"
            );
        }
    }
}

/// Resolve once the flag is set. A dropped sender means nobody can ask for
/// shutdown any more, so wait forever.
async fn wait_for_shutdown(rx: &mut ShutdownSignal) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
