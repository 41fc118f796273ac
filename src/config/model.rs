// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::RendererCommand;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [renderer]
/// interpreter = "/usr/bin/python3"
/// script = "render_and_save.py"
/// args = ["--days", "7"]
/// expect_output = "output.png"
///
/// [loop]
/// log = "render_loop.log"
/// interval = "15m"
/// ```
///
/// All sections are optional; `interpreter` and `script` must come from
/// either the file or the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// What to run, from `[renderer]`.
    #[serde(default)]
    pub renderer: RendererSection,

    /// How often and where to log, from `[loop]`.
    #[serde(default, rename = "loop")]
    pub run_loop: LoopSection,
}

/// `[renderer]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RendererSection {
    /// Interpreter executable (e.g. a Python binary).
    #[serde(default)]
    pub interpreter: Option<String>,

    /// Renderer entry point, passed as the interpreter's first argument.
    #[serde(default)]
    pub script: Option<String>,

    /// Extra arguments placed after the script path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the renderer; inherited when unset.
    #[serde(default)]
    pub working_dir: Option<String>,

    /// File the renderer is expected to produce on every successful run.
    #[serde(default)]
    pub expect_output: Option<String>,
}

/// `[loop]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoopSection {
    /// Append-only run log.
    #[serde(default = "default_log")]
    pub log: String,

    /// Wait between runs, e.g. `"15m"`.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Maximum renderer runtime. Unset means the renderer may run forever.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_log() -> String {
    "render_loop.log".to_string()
}

fn default_interval() -> String {
    "15m".to_string()
}

impl Default for LoopSection {
    fn default() -> Self {
        Self {
            log: default_log(),
            interval: default_interval(),
            timeout: None,
        }
    }
}

/// Fully resolved supervisor settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub interpreter: PathBuf,
    pub script: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub expect_output: Option<PathBuf>,
    pub log: PathBuf,
    pub interval: Duration,
    pub timeout: Option<Duration>,
}

impl SupervisorConfig {
    /// The four inputs the loop cannot do without; everything else off.
    pub fn new(
        interpreter: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        log: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            args: Vec::new(),
            working_dir: None,
            expect_output: None,
            log: log.into(),
            interval,
            timeout: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_expect_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.expect_output = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The process-launch part of the config.
    pub fn renderer_command(&self) -> RendererCommand {
        RendererCommand {
            interpreter: self.interpreter.clone(),
            script: self.script.clone(),
            args: self.args.clone(),
            working_dir: self.working_dir.clone(),
        }
    }
}
