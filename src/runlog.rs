// src/runlog.rs

//! Append-only run log.
//!
//! Status lines keep a fixed shape so existing tooling can grep them:
//!
//! ```text
//! [2026-10-19 08:00:00] === Starting render loop ===
//! Using PY=/usr/bin/python3
//! Using SCRIPT=render_and_save.py
//! [2026-10-19 08:00:00] Running renderer...
//! <renderer stdout/stderr, verbatim>
//! [2026-10-19 08:00:04] Renderer finished OK
//! ```
//!
//! The renderer's own output is written straight into the same file by the
//! child process (see [`RunLog::child_stdio`]).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::Local;

use crate::engine::CycleOutcome;
use crate::errors::{Result, SupervisorError};

/// Timestamp format used in every bracketed status line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Open (creating if needed) the run log in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SupervisorError::LogOpen {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Startup banner; written once per supervisor lifetime.
    pub fn write_header(&self, interpreter: &Path, script: &Path) -> io::Result<()> {
        self.write_lines(&format!(
            "[{}] === Starting render loop ===\nUsing PY={}\nUsing SCRIPT={}\n",
            timestamp(),
            interpreter.display(),
            script.display()
        ))
    }

    pub fn write_running(&self) -> io::Result<()> {
        self.write_stamped("Running renderer...")
    }

    pub fn write_outcome(&self, outcome: &CycleOutcome) -> io::Result<()> {
        self.write_stamped(&outcome.log_line())
    }

    pub fn write_stopped(&self) -> io::Result<()> {
        self.write_stamped("=== Render loop stopped ===")
    }

    /// Unstamped line, in the place where renderer output would appear.
    pub fn write_raw(&self, line: &str) -> io::Result<()> {
        self.write_lines(&format!("{line}\n"))
    }

    pub fn write_stamped(&self, message: &str) -> io::Result<()> {
        self.write_lines(&format!("[{}] {message}\n", timestamp()))
    }

    /// A `Stdio` that appends into this log, for a child's stdout or stderr.
    pub fn child_stdio(&self) -> io::Result<Stdio> {
        Ok(Stdio::from(self.file.try_clone()?))
    }

    // One write_all per call so concurrent writers only interleave whole lines.
    fn write_lines(&self, text: &str) -> io::Result<()> {
        let mut f = &self.file;
        f.write_all(text.as_bytes())?;
        f.flush()
    }
}

pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
