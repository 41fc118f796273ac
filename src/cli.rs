// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every value given here overrides the matching key from the config file.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `renderloop`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "renderloop",
    version,
    about = "Run a renderer script on a fixed interval, logging every run.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Renderloop.toml` in the current working directory. When the
    /// default file does not exist, the values given on the command line are
    /// used on their own.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Interpreter executable used to run the renderer script.
    #[arg(long, value_name = "PATH")]
    pub interpreter: Option<String>,

    /// Renderer entry point, passed as the first argument to the interpreter.
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Append-only run log receiving status lines and renderer output.
    #[arg(long, value_name = "PATH")]
    pub log: Option<String>,

    /// Wait between the end of one run and the start of the next (e.g. `15m`).
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Kill a renderer that runs longer than this (e.g. `5m`).
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Run a single cycle and exit.
    #[arg(long, conflicts_with = "cycles")]
    pub once: bool,

    /// Run this many cycles and exit.
    #[arg(long, value_name = "N")]
    pub cycles: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RENDERLOOP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Cycle limit implied by `--once` / `--cycles`; `None` means unbounded.
    pub fn max_cycles(&self) -> Option<u64> {
        if self.once { Some(1) } else { self.cycles }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
