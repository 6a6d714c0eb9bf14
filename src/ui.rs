//! Terminal status output modes.
//!
//! Styled per-module and per-check status lines go to stdout and are
//! gated by the [`OutputMode`]; tracing logs are independent and go to
//! stderr regardless of mode.

/// How much status output a run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No status lines; the exit status and the report carry the outcome.
    Quiet,

    /// One line per module and check.
    #[default]
    Normal,

    /// Module lines additionally carry priorities and skip reasons.
    Verbose,
}

impl OutputMode {
    /// Resolve from the CLI flags. Quiet wins when both are given.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    pub fn is_quiet(self) -> bool {
        self == OutputMode::Quiet
    }

    pub fn is_verbose(self) -> bool {
        self == OutputMode::Verbose
    }
}
