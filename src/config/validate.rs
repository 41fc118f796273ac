// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, SupervisorConfig};
use crate::errors::{Result, SupervisorError};

/// Turn a raw `ConfigFile` (after CLI overrides) into a `SupervisorConfig`.
///
/// This checks:
/// - `interpreter` and `script` are present and non-empty
/// - `log` is non-empty
/// - `interval` and `timeout` parse and are non-zero
///
/// It does **not** check that the interpreter or script exist on disk: a
/// missing renderer is a per-cycle failure, not a startup failure.
pub fn resolve(cfg: &ConfigFile) -> Result<SupervisorConfig> {
    let interpreter = required_path(cfg.renderer.interpreter.as_deref(), "renderer.interpreter")?;
    let script = required_path(cfg.renderer.script.as_deref(), "renderer.script")?;

    let interval = duration_field(&cfg.run_loop.interval, "loop.interval")?;
    let timeout = cfg
        .run_loop
        .timeout
        .as_deref()
        .map(|s| duration_field(s, "loop.timeout"))
        .transpose()?;

    let resolved = SupervisorConfig {
        interpreter,
        script,
        args: cfg.renderer.args.clone(),
        working_dir: cfg.renderer.working_dir.as_deref().map(PathBuf::from),
        expect_output: cfg.renderer.expect_output.as_deref().map(PathBuf::from),
        log: PathBuf::from(&cfg.run_loop.log),
        interval,
        timeout,
    };

    validate_config(&resolved)?;
    Ok(resolved)
}

/// Validate an already-resolved config.
///
/// Exposed separately so configs built in code (e.g. via
/// [`SupervisorConfig::new`]) get the same checks as file-based ones.
pub fn validate_config(cfg: &SupervisorConfig) -> Result<()> {
    if cfg.interpreter.as_os_str().is_empty() {
        return Err(config_error("renderer.interpreter must not be empty"));
    }
    if cfg.script.as_os_str().is_empty() {
        return Err(config_error("renderer.script must not be empty"));
    }
    if cfg.log.as_os_str().is_empty() {
        return Err(config_error("loop.log must not be empty"));
    }
    if cfg.interval.is_zero() {
        return Err(config_error("loop.interval must be greater than zero"));
    }
    if cfg.timeout.is_some_and(|t| t.is_zero()) {
        return Err(config_error("loop.timeout must be greater than zero when set"));
    }
    Ok(())
}

fn required_path(value: Option<&str>, key: &str) -> Result<PathBuf> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => Err(config_error(format!(
            "{key} is required (set it in the config file or on the command line)"
        ))),
    }
}

fn duration_field(value: &str, key: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| config_error(format!("invalid {key}: {e}")))
}

fn config_error(msg: impl Into<String>) -> SupervisorError {
    SupervisorError::ConfigError(msg.into())
}
