// src/errors.rs

//! Crate-wide error type.
//!
//! Startup failures (bad config, unopenable run log) are surfaced through
//! [`SupervisorError`]. Renderer failures never are: they are recorded in the
//! run log as cycle outcomes and the loop carries on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("cannot read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open run log {path:?} for append: {source}")]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
