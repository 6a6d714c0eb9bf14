//! Shell command execution.
//!
//! All host side effects (package installs, service control, firewall
//! changes) and all verification probes go through the [`CommandRunner`]
//! trait, so module actions and checks can be exercised against a
//! [`fake::FakeRunner`] without touching a real host.

mod command;
pub mod fake;

pub use command::{CommandResult, ShellRunner};

use crate::error::Result;

/// Seam between provisioning/verification logic and the host.
///
/// The orchestrator holds one runner for the whole run; by construction of
/// the sequential run, at most one command mutates the host at a time.
pub trait CommandRunner {
    /// Execute a shell command, capturing output.
    fn run(&self, command: &str) -> Result<CommandResult>;

    /// Execute a shell command with `input` written to its stdin.
    ///
    /// Secrets travel this way: stdin never appears in a process listing
    /// or in the issued command text, unlike an interpolated argument.
    fn run_with_input(&self, command: &str, input: &str) -> Result<CommandResult>;

    /// Execute a command and reduce it to a boolean.
    ///
    /// A spawn error is indistinguishable from a non-zero exit: both are
    /// `false`. Verification checks rely on this collapse, so a missing
    /// tool fails a check the same way a false condition does.
    fn probe(&self, command: &str) -> bool {
        self.run(command).map(|r| r.success).unwrap_or(false)
    }

    /// Execute a command and return trimmed stdout, or `None` on failure.
    fn capture(&self, command: &str) -> Option<String> {
        self.run(command)
            .ok()
            .filter(|r| r.success)
            .map(|r| r.stdout.trim().to_string())
    }
}
