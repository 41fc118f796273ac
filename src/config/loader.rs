// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, SupervisorConfig};
use crate::config::validate::resolve;
use crate::errors::{self, SupervisorError};

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; required keys and durations are
/// checked by [`resolve`].
pub fn load_from_path(path: impl AsRef<Path>) -> errors::Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SupervisorError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Build the supervisor config for a CLI invocation.
///
/// - An explicit `--config` must exist.
/// - Without `--config`, [`default_config_path`] is used if present;
///   otherwise every setting comes from the command line and defaults.
/// - CLI values override file values.
pub fn load_for_cli(args: &CliArgs) -> Result<SupervisorConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading config from {path:?}"))?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_from_path(&path).with_context(|| format!("loading config from {path:?}"))?
            } else {
                debug!(path = ?path, "no default config file; using CLI values only");
                ConfigFile::default()
            }
        }
    };

    apply_cli_overrides(&mut cfg, args);
    Ok(resolve(&cfg)?)
}

/// Layer command-line values over a loaded file.
pub fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) {
    if let Some(ref v) = args.interpreter {
        cfg.renderer.interpreter = Some(v.clone());
    }
    if let Some(ref v) = args.script {
        cfg.renderer.script = Some(v.clone());
    }
    if let Some(ref v) = args.log {
        cfg.run_loop.log = v.clone();
    }
    if let Some(ref v) = args.interval {
        cfg.run_loop.interval = v.clone();
    }
    if let Some(ref v) = args.timeout {
        cfg.run_loop.timeout = Some(v.clone());
    }
}

/// Default config location: `Renderloop.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Renderloop.toml")
}
