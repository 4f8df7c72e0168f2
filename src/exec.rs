//! External command execution.
//!
//! [`Executor`] is the raw seam to the operating system (spawn, wait, look up
//! programs on `PATH`).  [`CommandRunner`] layers the user-facing policy on
//! top: a spinner for captured runs, an inherited terminal for interactive
//! ones, and conversion of every failure into a logged `false` so that no
//! subprocess problem ever escapes a step.
#[cfg(any(test, feature = "test-support"))]
use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Output, Stdio};
#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;

use crate::error::StepError;
use crate::logging::Log;
use crate::prompt::Prompt;

/// Result of a command execution.
///
/// Interactive runs leave `stdout` and `stderr` empty because the output went
/// straight to the user's terminal.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// A successful result with the given stdout.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }

    /// A failed result with the given stderr.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn failed(stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: false,
            code: Some(1),
        }
    }

    /// Convert a non-zero exit into [`StepError::Subprocess`].
    ///
    /// # Errors
    ///
    /// Returns an error when `success` is `false`.
    pub fn checked(self, command: &str) -> Result<Self, StepError> {
        if self.success {
            Ok(self)
        } else {
            Err(StepError::Subprocess {
                command: command.to_string(),
                code: self.code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// How a command interacts with the user's terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Output captured, spinner shown while running.
    Captured,
    /// Terminal inherited so the user can answer prompts (sudo, installers).
    Interactive,
}

/// Low-level command execution, injectable for tests.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a shell command line, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Spawn`] if the shell cannot be launched.  A
    /// non-zero exit is reported through [`ExecResult::success`], not as an
    /// error.
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<ExecResult, StepError>;

    /// Run a shell command line attached to the user's terminal.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Spawn`] if the shell cannot be launched.
    fn run_interactive(&self, command: &str, cwd: Option<&Path>)
    -> Result<ExecResult, StepError>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that runs commands through `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn shell(command: &str, cwd: Option<&Path>) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Executor for SystemExecutor {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<ExecResult, StepError> {
        Self::shell(command, cwd)
            .stdin(Stdio::null())
            .output()
            .map(ExecResult::from)
            .map_err(|source| StepError::Spawn {
                command: command.to_string(),
                source,
            })
    }

    fn run_interactive(
        &self,
        command: &str,
        cwd: Option<&Path>,
    ) -> Result<ExecResult, StepError> {
        let status = Self::shell(command, cwd)
            .status()
            .map_err(|source| StepError::Spawn {
                command: command.to_string(),
                source,
            })?;
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// One command to run, with its presentation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Shell command line.
    pub command: &'a str,
    /// Label shown to the user; the raw command when `None`.
    pub description: Option<&'a str>,
    /// Captured or interactive.
    pub mode: Mode,
    /// Working directory, inherited when `None`.
    pub cwd: Option<&'a Path>,
}

impl<'a> Invocation<'a> {
    /// A captured run of `command`.
    #[must_use]
    pub const fn captured(command: &'a str) -> Self {
        Self {
            command,
            description: None,
            mode: Mode::Captured,
            cwd: None,
        }
    }

    /// An interactive run of `command`.
    #[must_use]
    pub const fn interactive(command: &'a str) -> Self {
        Self {
            command,
            description: None,
            mode: Mode::Interactive,
            cwd: None,
        }
    }

    /// Attach a user-facing description.
    #[must_use]
    pub const fn described(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    /// Run inside `dir`.
    #[must_use]
    pub const fn in_dir(mut self, dir: &'a Path) -> Self {
        self.cwd = Some(dir);
        self
    }

    fn label(&self) -> &'a str {
        self.description.unwrap_or(self.command)
    }
}

/// Step-level command runner: shows progress, reports failures, never errors.
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner<'a> {
    executor: &'a dyn Executor,
    prompt: &'a dyn Prompt,
    log: &'a dyn Log,
}

impl<'a> CommandRunner<'a> {
    /// Create a runner over the given executor, prompt and logger.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, prompt: &'a dyn Prompt, log: &'a dyn Log) -> Self {
        Self {
            executor,
            prompt,
            log,
        }
    }

    /// Run an invocation, reporting any failure.  Returns `true` on exit
    /// status zero.
    pub fn run(&self, invocation: &Invocation<'_>) -> bool {
        match self.try_run(invocation) {
            Ok(_) => true,
            Err(e) => {
                self.log.error(&e.to_string());
                false
            }
        }
    }

    /// Run a command as a best-effort step: failures are logged at debug
    /// level and otherwise ignored.
    pub fn run_best_effort(&self, invocation: &Invocation<'_>) {
        if let Err(e) = self.try_run(invocation) {
            self.log.debug(&format!("best-effort step failed: {e}"));
        }
    }

    /// Run an invocation, returning the typed outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Spawn`] if the process could not be launched and
    /// [`StepError::Subprocess`] on a non-zero exit.
    pub fn try_run(&self, invocation: &Invocation<'_>) -> Result<ExecResult, StepError> {
        self.log.debug(&format!("running: {}", invocation.command));
        let result = match invocation.mode {
            Mode::Captured => {
                let pb = self.prompt.spinner(invocation.label());
                let result = self.executor.run(invocation.command, invocation.cwd);
                pb.finish_and_clear();
                result
            }
            Mode::Interactive => {
                self.log.info(invocation.label());
                self.executor
                    .run_interactive(invocation.command, invocation.cwd)
            }
        }?;
        for line in result.stdout.lines().filter(|line| !line.trim().is_empty()) {
            self.log.debug(&format!("  {line}"));
        }
        result.checked(invocation.command)
    }

    /// Check if a program is available on `PATH`.
    #[must_use]
    pub fn command_exists(&self, program: &str) -> bool {
        self.executor.which(program)
    }

    /// The logger this runner reports through.
    #[must_use]
    pub const fn log(&self) -> &'a dyn Log {
        self.log
    }
}

/// Scriptable [`Executor`] that records commands instead of running them.
///
/// Every command succeeds unless it contains one of the configured failure
/// patterns; [`Executor::which`] answers from a fixed program list.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct FakeExecutor {
    programs: HashSet<String>,
    failing: Vec<String>,
    calls: Mutex<Vec<(Mode, String)>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeExecutor {
    /// An executor with no programs on `PATH` where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `programs` as present on `PATH`.
    #[must_use]
    pub fn with_programs(mut self, programs: &[&str]) -> Self {
        self.programs
            .extend(programs.iter().map(ToString::to_string));
        self
    }

    /// Fail every command whose text contains `pattern`.
    #[must_use]
    pub fn failing(mut self, pattern: &str) -> Self {
        self.failing.push(pattern.to_string());
        self
    }

    /// Every command run so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().map_or_else(
            |_| Vec::new(),
            |calls| calls.iter().map(|(_, c)| c.clone()).collect(),
        )
    }

    /// Every command run so far with its mode.
    #[must_use]
    pub fn calls(&self) -> Vec<(Mode, String)> {
        self.calls
            .lock()
            .map_or_else(|_| Vec::new(), |calls| calls.clone())
    }

    fn record(&self, mode: Mode, command: &str) -> ExecResult {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((mode, command.to_string()));
        }
        if self.failing.iter().any(|p| command.contains(p.as_str())) {
            ExecResult::failed("scripted failure")
        } else {
            ExecResult::ok("")
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Executor for FakeExecutor {
    fn run(&self, command: &str, _cwd: Option<&Path>) -> Result<ExecResult, StepError> {
        Ok(self.record(Mode::Captured, command))
    }

    fn run_interactive(
        &self,
        command: &str,
        _cwd: Option<&Path>,
    ) -> Result<ExecResult, StepError> {
        Ok(self.record(Mode::Interactive, command))
    }

    fn which(&self, program: &str) -> bool {
        self.programs.contains(program)
    }
}
