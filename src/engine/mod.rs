// src/engine/mod.rs

//! The supervisor loop.
//!
//! - [`cycle`] holds the per-iteration outcome and record types.
//! - [`supervisor`] drives invoke → record → wait → repeat, and observes a
//!   shutdown flag between cycles and during the wait.

pub mod cycle;
pub mod supervisor;

pub use cycle::{CycleOutcome, CycleRecord};
pub use supervisor::{ShutdownSignal, Supervisor, SupervisorOptions, shutdown_channel};
