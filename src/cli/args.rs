//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros; the entry point is
//! the [`Cli`] struct.

use crate::ui::OutputMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default site configuration location on a managed host.
pub const DEFAULT_SITE_CONFIG: &str = "/etc/palisade/site.yml";

/// Palisade - Hardened security stack provisioning and verification.
#[derive(Debug, Parser)]
#[command(name = "palisade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the site configuration file
    #[arg(short, long, global = true, env = "PALISADE_SITE")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full installation sequence (default if no command specified)
    Install(InstallArgs),

    /// Run only the verification battery against a provisioned host
    Verify,

    /// Print the persisted verification report
    Report,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Print the module plan without touching the host
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Resolved site config path (flag, env, or default location).
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_CONFIG))
    }

    /// Resolved status output mode from `--quiet` / `--verbose`.
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.quiet, self.verbose)
    }
}
