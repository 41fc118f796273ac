// src/exec/command.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use crate::config::as_millis_u64;
use crate::engine::CycleOutcome;
use crate::runlog::RunLog;

/// `<interpreter> <script> [args...]`, optionally in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    pub interpreter: PathBuf,
    pub script: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl RendererCommand {
    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.script).args(&self.args);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        // Own process group, so a timeout can take down whatever the
        // renderer spawned as well.
        #[cfg(unix)]
        {
            cmd.process_group(0);
        }
        cmd
    }
}

impl fmt::Display for RendererCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.interpreter.display(), self.script.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run the renderer once, with stdout and stderr appended to `log`.
///
/// Never fails: a process that cannot be launched is reported into the run
/// log (where its stderr would have gone) and counts as `Failed(-1)`.
pub async fn run_renderer(
    renderer: &RendererCommand,
    log: &RunLog,
    timeout: Option<Duration>,
) -> CycleOutcome {
    match run_renderer_inner(renderer, log, timeout).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(cmd = %renderer, error = %err, "renderer execution error");
            if let Err(e) = log.write_raw(&format!("renderloop: {err:#}")) {
                warn!(error = %e, "failed to append launch error to run log");
            }
            CycleOutcome::Failed(-1)
        }
    }
}

async fn run_renderer_inner(
    renderer: &RendererCommand,
    log: &RunLog,
    timeout: Option<Duration>,
) -> Result<CycleOutcome> {
    info!(cmd = %renderer, "starting renderer process");

    let mut cmd = renderer.to_command();
    cmd.stdout(log.child_stdio().context("attaching run log to renderer stdout")?)
        .stderr(log.child_stdio().context("attaching run log to renderer stderr")?)
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("launching '{}'", renderer))?;

    let status = match timeout {
        None => child
            .wait()
            .await
            .with_context(|| format!("waiting for '{}'", renderer))?,
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(res) => res.with_context(|| format!("waiting for '{}'", renderer))?,
            Err(_) => {
                warn!(cmd = %renderer, timeout_ms = as_millis_u64(limit), "renderer timed out; killing");
                kill_renderer(&mut child, renderer).await;
                return Ok(CycleOutcome::TimedOut(limit));
            }
        },
    };

    let code = status.code();
    info!(
        cmd = %renderer,
        exit_code = code.unwrap_or(-1),
        success = status.success(),
        "renderer process exited"
    );

    Ok(CycleOutcome::from_exit_code(code))
}

/// Kill the renderer's whole process group, then the child itself, and reap
/// it. Nothing started by this renderer may write to the log afterwards.
async fn kill_renderer(child: &mut Child, renderer: &RendererCommand) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
            if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
                warn!(cmd = %renderer, pid, error = %e, "failed to kill renderer process group");
            }
        }
    }

    // `kill` also waits for the child, so no zombie is left behind.
    if let Err(e) = child.kill().await {
        warn!(cmd = %renderer, error = %e, "failed to kill timed-out renderer");
    }
}
