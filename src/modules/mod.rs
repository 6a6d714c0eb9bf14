//! Provisioning modules: the fixed, numbered installation sequence.
//!
//! A [`Module`] is one idempotent unit of provisioning work, identified by
//! a numeric priority and a name. The catalog is fixed: the same modules
//! run in the same ascending order on every install. Actions live in
//! [`actions`]; the orchestrator drives the sequence.

pub mod actions;

use crate::error::{PalisadeError, Result};

/// Identity of a provisioning module.
///
/// Closed set: the installation sequence is data, not configuration. The
/// verification module is terminal and dispatched specially by the
/// orchestrator (it produces check counts, not just an outcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Base packages, timezone, hostname preconditions.
    SystemPrep,

    /// Hostname and hosts-file identity for the primary host.
    NetworkIdentity,

    /// Host firewall service up and enabled at boot.
    Firewall,

    /// FreeIPA identity service install and start.
    IdentityService,

    /// rsyslog central log receiver configuration.
    LogAggregation,

    /// Wazuh SIEM manager install and start.
    Siem,

    /// Terminal module: check battery plus persisted report.
    Verification,
}

impl ModuleKind {
    /// Stable module name used in logs, outcomes, and the report.
    pub fn name(&self) -> &'static str {
        match self {
            ModuleKind::SystemPrep => "system-prep",
            ModuleKind::NetworkIdentity => "network-identity",
            ModuleKind::Firewall => "firewall",
            ModuleKind::IdentityService => "identity-service",
            ModuleKind::LogAggregation => "log-aggregation",
            ModuleKind::Siem => "siem",
            ModuleKind::Verification => "verification",
        }
    }
}

/// One numbered step in the installation sequence.
#[derive(Debug, Clone, Copy)]
pub struct Module {
    /// Unique priority; defines the total execution order.
    pub priority: u32,

    /// Module identity (also carries the action).
    pub kind: ModuleKind,
}

impl Module {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Outcome of one module's execution. Recorded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// Module completed all of its apply steps.
    Success,

    /// Module's action did not complete; aborts the remaining sequence.
    Failed(String),

    /// Module never executed (an earlier module failed).
    Skipped(String),
}

impl ModuleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ModuleOutcome::Success)
    }

    /// Marker used in per-outcome log lines and the report.
    pub fn marker(&self) -> &'static str {
        match self {
            ModuleOutcome::Success => "PASS",
            ModuleOutcome::Failed(_) => "FAIL",
            ModuleOutcome::Skipped(_) => "SKIP",
        }
    }
}

impl std::fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleOutcome::Success => write!(f, "success"),
            ModuleOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            ModuleOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// The validated, ordered installation sequence.
#[derive(Debug, Clone)]
pub struct ModuleSet {
    modules: Vec<Module>,
}

impl ModuleSet {
    /// Build a set from modules, sorting by ascending priority.
    ///
    /// Duplicate priorities are a configuration error: the sequence must be
    /// a total order.
    pub fn new(mut modules: Vec<Module>) -> Result<Self> {
        modules.sort_by_key(|m| m.priority);

        for pair in modules.windows(2) {
            if pair[0].priority == pair[1].priority {
                return Err(PalisadeError::ConfigValidationError {
                    message: format!(
                        "modules '{}' and '{}' share priority {}",
                        pair[0].name(),
                        pair[1].name(),
                        pair[0].priority
                    ),
                });
            }
        }

        Ok(Self { modules })
    }

    /// The fixed installation catalog.
    pub fn catalog() -> Self {
        // Priorities are spaced so a future module can slot between two
        // existing ones without renumbering.
        Self::new(vec![
            Module {
                priority: 10,
                kind: ModuleKind::SystemPrep,
            },
            Module {
                priority: 20,
                kind: ModuleKind::NetworkIdentity,
            },
            Module {
                priority: 30,
                kind: ModuleKind::Firewall,
            },
            Module {
                priority: 40,
                kind: ModuleKind::IdentityService,
            },
            Module {
                priority: 50,
                kind: ModuleKind::LogAggregation,
            },
            Module {
                priority: 60,
                kind: ModuleKind::Siem,
            },
            Module {
                priority: 90,
                kind: ModuleKind::Verification,
            },
        ])
        .expect("catalog priorities are unique")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
