//! Scripted command runner for tests.
//!
//! Mirrors the real runner's surface: callers script responses keyed on a
//! command substring and assert afterwards on the exact sequence of
//! commands issued. Unscripted commands fall back to a configurable
//! default, so a test only scripts the commands it cares about.

use crate::error::Result;
use crate::shell::{CommandResult, CommandRunner};
use std::sync::Mutex;

/// A scripted response: the first rule whose `needle` is contained in the
/// issued command wins.
struct Rule {
    needle: String,
    result: CommandResult,
}

/// Command runner backed by scripted responses.
pub struct FakeRunner {
    rules: Mutex<Vec<Rule>>,
    log: Mutex<Vec<String>>,
    inputs: Mutex<Vec<(String, String)>>,
    default_success: bool,
}

impl FakeRunner {
    /// A runner where every unscripted command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            inputs: Mutex::new(Vec::new()),
            default_success: true,
        }
    }

    /// A runner where every unscripted command fails with exit code 1.
    pub fn failing() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            inputs: Mutex::new(Vec::new()),
            default_success: false,
        }
    }

    /// Script a successful response with the given stdout for any command
    /// containing `needle`.
    pub fn respond(self, needle: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.push_rule(needle, CommandResult::success(stdout));
        self
    }

    /// Script a failure (exit code 1) for any command containing `needle`.
    pub fn fail_on(self, needle: impl Into<String>) -> Self {
        self.push_rule(needle, CommandResult::failure(Some(1), "scripted failure"));
        self
    }

    /// Script a success with empty output for any command containing `needle`.
    pub fn succeed_on(self, needle: impl Into<String>) -> Self {
        self.push_rule(needle, CommandResult::success(""));
        self
    }

    fn push_rule(&self, needle: impl Into<String>, result: CommandResult) {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.into(),
            result,
        });
    }

    /// Every command issued so far, in order.
    pub fn issued(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Whether any issued command contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.log.lock().unwrap().iter().any(|c| c.contains(needle))
    }

    /// Number of issued commands containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.contains(needle))
            .count()
    }

    /// Every (command, stdin) pair fed through `run_with_input`, in order.
    pub fn inputs(&self) -> Vec<(String, String)> {
        self.inputs.lock().unwrap().clone()
    }

    fn respond_to(&self, command: &str) -> CommandResult {
        let rules = self.rules.lock().unwrap();
        if let Some(rule) = rules.iter().find(|r| command.contains(&r.needle)) {
            return rule.result.clone();
        }

        if self.default_success {
            CommandResult::success("")
        } else {
            CommandResult::failure(Some(1), "unscripted command")
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str) -> Result<CommandResult> {
        self.log.lock().unwrap().push(command.to_string());
        Ok(self.respond_to(command))
    }

    fn run_with_input(&self, command: &str, input: &str) -> Result<CommandResult> {
        self.log.lock().unwrap().push(command.to_string());
        self.inputs
            .lock()
            .unwrap()
            .push((command.to_string(), input.to_string()));
        Ok(self.respond_to(command))
    }
}
