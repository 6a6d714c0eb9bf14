//! Palisade - Hardened on-premises security stack provisioning.
//!
//! Palisade provisions an identity service (FreeIPA), central log
//! aggregation (rsyslog), and a SIEM manager (Wazuh) on a single host as a
//! fixed sequence of idempotent modules, then verifies the result with a
//! check battery and persists a verification report.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and dispatch
//! - [`error`] - Error types and result aliases
//! - [`modules`] - The fixed provisioning module catalog and actions
//! - [`orchestrator`] - Sequential execution, abort semantics, run result
//! - [`report`] - Verification report rendering and persistence
//! - [`shell`] - Shell command execution behind the runner seam
//! - [`site`] - Site configuration (the per-run environment store)
//! - [`ui`] - Terminal output modes
//! - [`verify`] - Check battery and probes
//!
//! # Example
//!
//! ```
//! use palisade::shell::fake::FakeRunner;
//! use palisade::ui::OutputMode;
//! use palisade::verify::{run_battery, Check, Probe, Severity};
//!
//! let runner = FakeRunner::succeeding();
//! let checks = vec![Check {
//!     label: "Log aggregation service".into(),
//!     severity: Severity::Hard,
//!     probe: Probe::ServiceActive { service: "rsyslog".into() },
//! }];
//! let summary = run_battery(&checks, &runner, OutputMode::Quiet);
//! assert!(summary.is_clean());
//! ```

pub mod cli;
pub mod error;
pub mod modules;
pub mod orchestrator;
pub mod report;
pub mod shell;
pub mod site;
pub mod ui;
pub mod verify;

pub use error::{PalisadeError, Result};
