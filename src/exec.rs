//! Subprocess execution behind an injectable [`Executor`] trait.
use std::borrow::Cow;
use std::process::{Command, ExitStatus, Output, Stdio};

use crate::error::CommandError;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output (empty when stdio is inherited).
    pub stdout: String,
    /// Captured standard error (empty when stdio is inherited).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, or `None` if the process was terminated by a signal.
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

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over process execution so tests can substitute a fake.
///
/// All calls block until the child exits. There is no timeout: a hung
/// command hangs the run.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command with inherited stdio, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot start and
    /// [`CommandError::Failed`] if it exits unsuccessfully.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError>;

    /// Run a command with inherited stdio, returning the result even on
    /// non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot start.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError>;

    /// Run a command with captured output, returning the result even on
    /// non-zero exit. Used for queries such as catalog lookups.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot start.
    fn capture(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError>;

    /// Check whether a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn spawn_error(program: &str, args: &[&str], source: std::io::Error) -> CommandError {
        CommandError::Spawn {
            command: display_command(program, args),
            source,
        }
    }
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            return Err(CommandError::Failed {
                command: display_command(program, args),
                code: result.code,
            });
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| Self::spawn_error(program, args, e))?;
        Ok(ExecResult::from(status))
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(program, args, e))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render a command line for display, shell-quoting each argument.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| shlex::try_quote(part).unwrap_or(Cow::Borrowed(part)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_command_plain_words() {
        assert_eq!(
            display_command("sudo", &["apt-get", "install", "-y", "git", "curl"]),
            "sudo apt-get install -y git curl"
        );
    }

    #[test]
    fn display_command_quotes_spaces() {
        let shown = display_command("bash", &["-lc", "npm i -g typescript"]);
        assert!(shown.starts_with("bash -lc "));
        assert!(
            shown.contains("'npm i -g typescript'") || shown.contains("\"npm i -g typescript\""),
            "script with spaces must be quoted: {shown}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn capture_echo() {
        let result = SystemExecutor.capture("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_failure_reports_command_and_code() {
        let err = SystemExecutor.run("false", &[]).unwrap_err();
        match err {
            CommandError::Failed { command, code } => {
                assert_eq!(command, "false");
                assert_eq!(code, Some(1));
            }
            CommandError::Spawn { .. } => panic!("expected Failed, got Spawn"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_unchecked_failure_is_not_an_error() {
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn spawn_failure_for_missing_program() {
        let err = SystemExecutor
            .capture("this-program-does-not-exist-12345", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn which_missing_program() {
        assert!(!SystemExecutor.which("this-program-does-not-exist-12345"));
    }
}
