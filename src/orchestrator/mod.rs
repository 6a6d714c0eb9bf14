//! Installation orchestration.
//!
//! Runs the module sequence in strictly ascending priority order against a
//! shared, non-transactional host. Every module is a hard dependency for
//! everything after it: on the first failure the remaining sequence is
//! recorded as skipped and nothing else executes. No rollback is attempted
//! on abort; modules are individually idempotent, so the operator
//! remediates and re-runs the tool.

pub mod readiness;

use crate::error::Result;
use crate::modules::{actions, Module, ModuleKind, ModuleOutcome, ModuleSet};
use crate::report::{self, SystemSnapshot};
use crate::shell::CommandRunner;
use crate::site::SiteConfig;
use crate::ui::OutputMode;
use crate::verify::{self, CheckSummary};
use chrono::{DateTime, Utc};
use console::style;
use readiness::Readiness;
use std::path::PathBuf;
use tracing::{error, info};

/// Aggregate result of one orchestration pass. Finalized once, immutable
/// thereafter.
#[derive(Debug)]
pub struct RunReport {
    /// Outcome per module, in execution order. Recorded once each.
    pub modules: Vec<(String, ModuleOutcome)>,

    /// Check battery totals from the verification module.
    pub checks: CheckSummary,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Where the verification report was persisted, if it was.
    pub report_path: Option<PathBuf>,
}

impl RunReport {
    /// The single externally-observable success signal: every module
    /// succeeded and no hard check failed.
    pub fn success(&self) -> bool {
        self.modules.iter().all(|(_, o)| o.is_success()) && self.checks.is_clean()
    }

    /// Process exit status for automation wrapping the tool.
    pub fn exit_code(&self) -> u8 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Drives one sequential installation pass.
pub struct Orchestrator<'a> {
    site: &'a SiteConfig,
    runner: &'a dyn CommandRunner,
    readiness: Readiness,
    output: OutputMode,
}

impl<'a> Orchestrator<'a> {
    pub fn new(site: &'a SiteConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            site,
            runner,
            readiness: Readiness::default(),
            output: OutputMode::default(),
        }
    }

    /// Override the readiness policy. Test seam.
    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    /// Set how much status output the run prints.
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Run the module sequence. Site configuration is validated pre-flight:
    /// no module runs against incomplete configuration.
    pub fn run(&self, set: &ModuleSet) -> Result<RunReport> {
        self.site.validate()?;

        let started_at = Utc::now();
        let mut modules: Vec<(String, ModuleOutcome)> = Vec::with_capacity(set.len());
        let mut checks = CheckSummary::default();
        let mut report_path = None;
        let mut aborted_after: Option<String> = None;

        for module in set.iter() {
            let name = module.name();

            if let Some(failed) = &aborted_after {
                let outcome = ModuleOutcome::Skipped(format!("aborted after '{}'", failed));
                info!("[{}] {}: {}", outcome.marker(), name, outcome);
                if self.output.is_verbose() {
                    println!("  {} {} ({})", style("⊘").dim(), name, outcome);
                } else if !self.output.is_quiet() {
                    println!("  {} {} (skipped)", style("⊘").dim(), name);
                }
                modules.push((name.to_string(), outcome));
                continue;
            }

            info!("module starting: {} (priority {})", name, module.priority);
            if self.output.is_verbose() {
                println!("{} {:>3} {}", style("▸").cyan(), module.priority, name);
            } else if !self.output.is_quiet() {
                println!("{} {}", style("▸").cyan(), name);
            }

            let outcome = match module.kind {
                ModuleKind::Verification => {
                    self.run_verification(started_at, &mut checks, &mut report_path)
                }
                _ => self.run_provisioning(module),
            };

            match &outcome {
                ModuleOutcome::Success => {
                    info!("[PASS] {}", name);
                    if !self.output.is_quiet() {
                        println!("  {} {}", style("✓").green(), name);
                    }
                }
                ModuleOutcome::Failed(reason) => {
                    error!("[FAIL] {}: {}", name, reason);
                    if !self.output.is_quiet() {
                        println!("  {} {} - {}", style("✗").red(), name, reason);
                    }
                    aborted_after = Some(name.to_string());
                }
                ModuleOutcome::Skipped(_) => {}
            }

            modules.push((name.to_string(), outcome));
        }

        Ok(RunReport {
            modules,
            checks,
            started_at,
            finished_at: Utc::now(),
            report_path,
        })
    }

    fn run_provisioning(&self, module: &Module) -> ModuleOutcome {
        let ctx = actions::ActionContext {
            site: self.site,
            runner: self.runner,
            readiness: self.readiness,
        };

        match actions::run(module.kind, &ctx) {
            Ok(()) => ModuleOutcome::Success,
            Err(e) => ModuleOutcome::Failed(e.to_string()),
        }
    }

    /// Terminal module: run the battery, collect the snapshot, render and
    /// persist the report. Hard-check failures surface through the exit
    /// status, not through this module's outcome; an unpersisted report
    /// does fail the module.
    fn run_verification(
        &self,
        started_at: DateTime<Utc>,
        checks: &mut CheckSummary,
        report_path: &mut Option<PathBuf>,
    ) -> ModuleOutcome {
        let battery = match verify::battery(self.site) {
            Ok(battery) => battery,
            Err(e) => return ModuleOutcome::Failed(e.to_string()),
        };

        *checks = verify::run_battery(&battery, self.runner, self.output);

        // Snapshot is collected at render time, not cached from earlier in
        // the run; values may differ from when a check ran.
        let snapshot = SystemSnapshot::collect(self.runner);
        let artifact =
            match report::render(checks, &snapshot, self.site, started_at, Utc::now()) {
                Ok(artifact) => artifact,
                Err(e) => return ModuleOutcome::Failed(e.to_string()),
            };

        match report::persist(&artifact, self.site) {
            Ok(path) => {
                info!("verification report written to {}", path.display());
                *report_path = Some(path);
                ModuleOutcome::Success
            }
            Err(e) => ModuleOutcome::Failed(e.to_string()),
        }
    }
}

/// Run only the verification stage against an already-provisioned host.
pub fn verify_only(
    site: &SiteConfig,
    runner: &dyn CommandRunner,
    output: OutputMode,
) -> Result<RunReport> {
    site.validate()?;

    let set = ModuleSet::new(vec![Module {
        priority: 90,
        kind: ModuleKind::Verification,
    }])?;

    Orchestrator::new(site, runner).with_output(output).run(&set)
}
