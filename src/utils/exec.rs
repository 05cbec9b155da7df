//! External command execution.
//!
//! Style compilers (`sass`, `lessc`) are invoked as opaque programs: their
//! stdout is the compiled CSS, their stderr is surfaced verbatim on failure.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let css = Cmd::from_slice(&["sass", "--no-source-map"])
//!     .arg("src/scss/main.scss")
//!     .cwd(root)
//!     .run_stdout()?;
//! ```

use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["sass"]` or `["npx", "sass"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter.next().map(|s| s.as_ref().to_owned()).unwrap_or_default();
        let mut built = Self::new(program);
        built.args = iter.map(|s| s.as_ref().to_owned()).collect();
        built
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Execute the command; a non-zero exit status is an error carrying stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();
        if name.is_empty() {
            bail!("empty command");
        }

        // Resolve through PATH first so a missing tool gets a clear message
        let program = which::which(&self.program)
            .with_context(|| format!("`{name}` not found in PATH"))?;

        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            bail!(format_error(&name, &output));
        }
        Ok(output)
    }

    /// Execute the command and return its stdout as UTF-8.
    pub fn run_stdout(self) -> Result<String> {
        let name = self.program_name();
        let output = self.run()?;
        String::from_utf8(output.stdout).with_context(|| format!("`{name}` produced non-UTF-8 output"))
    }
}

/// Build the failure message: exit status plus raw stderr (or stdout if stderr is empty).
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };

    if detail.is_empty() {
        format!("`{name}` failed: {}", output.status)
    } else {
        format!("`{name}` failed: {}\n{detail}", output.status)
    }
}
