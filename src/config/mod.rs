// src/config/mod.rs

//! Configuration loading and validation for renderloop.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved runtime config (`model.rs`).
//! - Load a config file from disk and layer CLI overrides on top (`loader.rs`).
//! - Validate values and parse durations (`validate.rs`, `duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::{as_millis_u64, format_duration, parse_duration};
pub use loader::{apply_cli_overrides, default_config_path, load_for_cli, load_from_path};
pub use model::{ConfigFile, LoopSection, RendererSection, SupervisorConfig};
pub use validate::{resolve, validate_config};
