// src/logging.rs

//! Diagnostic logging for `renderloop` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `RENDERLOOP_LOG` environment variable: either a bare level ("info",
//!    "warning", ...) or `EnvFilter` directives such as
//!    `"renderloop::exec=debug,warn"`
//! 3. default to `info`
//!
//! Diagnostics go to STDERR. The run log file is written separately by
//! [`crate::runlog`] and keeps its own fixed line format.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "RENDERLOOP_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Resolve the filter from the CLI level and the raw `RENDERLOOP_LOG` value.
///
/// Unparseable directives fall back to `info` with a note on stderr, since
/// the subscriber that would report it doesn't exist yet.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return level_filter(level_from_log_level(lvl));
    }

    let Some(raw) = env_value.map(str::trim).filter(|s| !s.is_empty()) else {
        return level_filter(tracing::Level::INFO);
    };

    if let Some(level) = parse_level_str(raw) {
        return level_filter(level);
    }

    EnvFilter::try_new(raw).unwrap_or_else(|e| {
        eprintln!("ignoring invalid {LOG_ENV_VAR}={raw:?}: {e}");
        level_filter(tracing::Level::INFO)
    })
}

fn level_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("")
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
