// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod runlog;

use anyhow::{Result, bail};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{SupervisorConfig, format_duration, load_for_cli};
use crate::engine::{ShutdownSignal, Supervisor, SupervisorOptions, shutdown_channel};
use crate::exec::ProcessBackend;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the process backend
/// - the supervisor loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    if args.cycles == Some(0) {
        bail!("--cycles must be at least 1");
    }

    let config = load_for_cli(&args)?;
    let options = SupervisorOptions {
        max_cycles: args.max_cycles(),
    };

    if args.dry_run {
        print_dry_run(&config, &options);
        return Ok(());
    }

    supervise(config, options, ctrl_c_shutdown()).await
}

/// Loop over the renderer until Ctrl-C.
pub async fn run_forever(config: SupervisorConfig) -> Result<()> {
    supervise(config, SupervisorOptions::default(), ctrl_c_shutdown()).await
}

/// Run the supervisor with the real process backend and a caller-owned
/// shutdown flag.
pub async fn supervise(
    config: SupervisorConfig,
    options: SupervisorOptions,
    shutdown: ShutdownSignal,
) -> Result<()> {
    let backend = ProcessBackend::from_config(&config);
    let supervisor = Supervisor::new(config, backend, options, shutdown)?;
    supervisor.run().await?;
    Ok(())
}

/// Ctrl-C → graceful shutdown.
fn ctrl_c_shutdown() -> ShutdownSignal {
    let (tx, rx) = shutdown_channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            // Keep the sender alive so the loop doesn't read a closed channel
            // as a stop request.
            std::future::pending::<()>().await;
        }
        let _ = tx.send(true);
    });
    rx
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &SupervisorConfig, options: &SupervisorOptions) {
    println!("renderloop dry-run");
    println!("  interpreter = {}", cfg.interpreter.display());
    println!("  script = {}", cfg.script.display());
    if !cfg.args.is_empty() {
        println!("  args = {:?}", cfg.args);
    }
    if let Some(ref dir) = cfg.working_dir {
        println!("  working_dir = {}", dir.display());
    }
    if let Some(ref out) = cfg.expect_output {
        println!("  expect_output = {}", out.display());
    }
    println!("  log = {}", cfg.log.display());
    println!("  interval = {}", format_duration(cfg.interval));
    match cfg.timeout {
        Some(t) => println!("  timeout = {}", format_duration(t)),
        None => println!("  timeout = none"),
    }
    match options.max_cycles {
        Some(n) => println!("  cycles = {n}"),
        None => println!("  cycles = unbounded"),
    }

    debug!("dry-run complete (no execution)");
}
