// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually launching the renderer, using
//! `tokio::process::Command`, with its output appended to the run log.
//!
//! - [`command`] builds and runs the interpreter + script process.
//! - [`backend`] is the seam the supervisor talks to, so tests can swap in a
//!   fake renderer.

pub mod backend;
pub mod command;

pub use backend::{ProcessBackend, RendererBackend};
pub use command::{RendererCommand, run_renderer};
