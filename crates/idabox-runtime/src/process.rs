//! External process invocation.
//!
//! Every interaction with the container runtime and the display utility
//! goes through a [`CommandRunner`]. Calls are synchronous: the runner
//! waits for the child before returning.

use std::fmt;
use std::process::{Command, ExitStatus, Stdio};

use idabox_common::error::{IdaboxError, Result};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, passed as-is without shell interpretation.
    pub args: Vec<String>,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// stdout and stderr are collected and returned.
    Capture,
    /// stdin, stdout and stderr are the invoking terminal's.
    Inherit,
    /// All output is discarded.
    Silent,
}

/// Result of a completed child process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// Whether the child exited with status zero.
    pub success: bool,
    /// Exit code, absent if the child was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty unless [`OutputMode::Capture`]).
    pub stdout: String,
    /// Captured stderr (empty unless [`OutputMode::Capture`]).
    pub stderr: String,
}

impl Outcome {
    /// A successful outcome with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed outcome with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Human-readable exit status.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.code.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit status: {code}"),
        )
    }

    /// Converts a failed outcome into [`IdaboxError::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the outcome is unsuccessful.
    pub fn into_result(self, invocation: &Invocation) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(IdaboxError::CommandFailed {
                command: invocation.to_string(),
                status: self.status_text(),
                detail: self.stderr,
            })
        }
    }
}

/// Executes external programs.
///
/// A non-zero exit is reported through [`Outcome::success`], never as an
/// `Err`; only failing to start the program is an error.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be found or spawned.
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<Outcome>;
}

/// Runner that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new system runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<Outcome> {
        let program =
            which::which(&invocation.program).map_err(|_| IdaboxError::ProgramNotFound {
                program: invocation.program.clone(),
            })?;
        tracing::debug!(command = %invocation, ?mode, "running external command");

        let mut cmd = Command::new(&program);
        let _ = cmd.args(&invocation.args);
        let spawn_err = |e| IdaboxError::Spawn {
            program: invocation.program.clone(),
            source: e,
        };

        let outcome = match mode {
            OutputMode::Capture => {
                let output = cmd.stdin(Stdio::null()).output().map_err(spawn_err)?;
                Outcome {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    ..from_status(output.status)
                }
            }
            OutputMode::Inherit => from_status(
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_err)?,
            ),
            OutputMode::Silent => from_status(
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map_err(spawn_err)?,
            ),
        };

        tracing::debug!(command = %invocation, code = ?outcome.code, "command finished");
        Ok(outcome)
    }
}

fn from_status(status: ExitStatus) -> Outcome {
    Outcome {
        success: status.success(),
        code: status.code(),
        ..Outcome::default()
    }
}
