//! Command-line interface: argument parsing and command dispatch.

mod args;

pub use args::{Cli, Commands, InstallArgs, DEFAULT_SITE_CONFIG};

use crate::error::Result;
use crate::modules::ModuleSet;
use crate::orchestrator::{self, Orchestrator, RunReport};
use crate::shell::ShellRunner;
use crate::site::SiteConfig;
use crate::ui::OutputMode;
use anyhow::anyhow;
use console::style;
use std::path::PathBuf;
use tracing::info;

/// Result of dispatching a command.
#[derive(Debug)]
pub struct DispatchResult {
    /// Process exit code to report.
    pub exit_code: u8,
}

impl DispatchResult {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn from_run(run: &RunReport) -> Self {
        Self {
            exit_code: run.exit_code(),
        }
    }
}

/// Routes parsed CLI commands to their implementations.
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch a parsed CLI invocation.
    pub fn dispatch(&self, cli: &Cli) -> Result<DispatchResult> {
        match &cli.command {
            None => self.install(cli, &InstallArgs::default()),
            Some(Commands::Install(args)) => self.install(cli, args),
            Some(Commands::Verify) => self.verify(cli),
            Some(Commands::Report) => self.report(cli),
        }
    }

    fn install(&self, cli: &Cli, args: &InstallArgs) -> Result<DispatchResult> {
        let output = cli.output_mode();
        let site = SiteConfig::load(&cli.config_path())?;
        site.validate()?;

        let set = ModuleSet::catalog();

        if args.dry_run {
            if !output.is_quiet() {
                println!("Module plan (dry-run mode, nothing executed):");
                for module in set.iter() {
                    println!("  {:>3}  {}", module.priority, module.name());
                }
            }
            return Ok(DispatchResult::ok());
        }

        let runner = ShellRunner::new();
        let run = Orchestrator::new(&site, &runner)
            .with_output(output)
            .run(&set)?;

        print_outcome_summary(&run, output);
        Ok(DispatchResult::from_run(&run))
    }

    fn verify(&self, cli: &Cli) -> Result<DispatchResult> {
        let output = cli.output_mode();
        let site = SiteConfig::load(&cli.config_path())?;
        let runner = ShellRunner::new();

        let run = orchestrator::verify_only(&site, &runner, output)?;

        print_outcome_summary(&run, output);
        Ok(DispatchResult::from_run(&run))
    }

    fn report(&self, cli: &Cli) -> Result<DispatchResult> {
        let site = SiteConfig::load(&cli.config_path())?;
        let install_root = site.get_path("install_root")?;

        let path = newest_report(&install_root)?
            .ok_or_else(|| anyhow!("no verification report found in {}", install_root.display()))?;

        let text = std::fs::read_to_string(&path)?;
        print!("{}", text);
        info!("printed report from {}", path.display());
        Ok(DispatchResult::ok())
    }
}

/// The most recent persisted report under `install_root`. Report filenames
/// carry an ISO date, so lexicographic order is date order.
fn newest_report(install_root: &std::path::Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<String> = None;

    for entry in std::fs::read_dir(install_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("VERIFICATION_REPORT_") && name.ends_with(".txt") {
            if newest.as_deref().map_or(true, |n| name.as_str() > n) {
                newest = Some(name);
            }
        }
    }

    Ok(newest.map(|name| install_root.join(name)))
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn print_outcome_summary(run: &RunReport, output: OutputMode) {
    if output.is_quiet() {
        return;
    }
    println!();
    if run.success() {
        println!("{} Installation verified.", style("✓").green().bold());
    } else {
        println!("{} Installation incomplete.", style("✗").red().bold());
        for (name, outcome) in &run.modules {
            if !outcome.is_success() {
                println!("  {} {}: {}", style("-").dim(), name, outcome);
            }
        }
        for label in &run.checks.failure_labels {
            println!("  {} check failed: {}", style("-").dim(), label);
        }
    }
    if let Some(path) = &run.report_path {
        println!("Report: {}", path.display());
    }
}
