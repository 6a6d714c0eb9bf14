//! Real shell-backed command execution.

use crate::error::{PalisadeError, Result};
use crate::shell::CommandRunner;
use std::process::{Command, Stdio};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

/// Runner that executes commands through the system shell.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

fn detect_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

fn from_output(output: std::process::Output) -> CommandResult {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        CommandResult {
            exit_code: Some(0),
            stdout,
            stderr,
            success: true,
        }
    } else {
        CommandResult {
            exit_code: output.status.code(),
            stdout,
            stderr,
            success: false,
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandResult> {
        let mut cmd = Command::new(detect_shell());
        cmd.arg("-c");
        cmd.arg(command);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|_| PalisadeError::CommandFailed {
            command: command.to_string(),
            code: None,
        })?;

        Ok(from_output(output))
    }

    fn run_with_input(&self, command: &str, input: &str) -> Result<CommandResult> {
        use std::io::Write as _;

        let mut cmd = Command::new(detect_shell());
        cmd.arg("-c");
        cmd.arg(command);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let failed = || PalisadeError::CommandFailed {
            command: command.to_string(),
            code: None,
        };

        let mut child = cmd.spawn().map_err(|_| failed())?;
        if let Some(mut stdin) = child.stdin.take() {
            // The command may exit without draining stdin; a broken pipe
            // here is its answer, not ours.
            let _ = stdin.write_all(input.as_bytes());
            let _ = stdin.write_all(b"\n");
        }

        let output = child.wait_with_output().map_err(|_| failed())?;
        Ok(from_output(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let runner = ShellRunner::new();
        let result = runner.run("echo hello").unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_reports_nonzero_exit() {
        let runner = ShellRunner::new();
        let result = runner.run("exit 3").unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn probe_collapses_failure_to_false() {
        let runner = ShellRunner::new();
        assert!(runner.probe("true"));
        assert!(!runner.probe("false"));
    }

    #[test]
    fn capture_trims_output() {
        let runner = ShellRunner::new();
        assert_eq!(runner.capture("echo '  padded  '").unwrap(), "padded");
    }

    #[test]
    fn run_with_input_feeds_stdin() {
        let runner = ShellRunner::new();
        let result = runner.run_with_input("cat", "fed through stdin").unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("fed through stdin"));
    }

    #[test]
    fn capture_returns_none_on_failure() {
        let runner = ShellRunner::new();
        assert!(runner.capture("exit 1").is_none());
    }
}
