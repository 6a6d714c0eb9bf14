//! Verification report rendering and persistence.
//!
//! The report is the durable record of a run: metadata, check totals, a
//! live system snapshot, the failure list, and fixed next-step guidance.
//! It contains sensitive site values (domain, host identity), so it is
//! written owner-read/write only. An un-persisted report is not a usable
//! deliverable: persist failure is fatal to the run's success signal even
//! when every check passed.

pub mod snapshot;

use crate::error::{PalisadeError, Result};
use crate::site::SiteConfig;
use crate::verify::CheckSummary;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

pub use snapshot::SystemSnapshot;

/// Rendered exactly when the failure list is empty.
pub const NO_FAILURES_SENTINEL: &str = "None - All tests passed!";

/// Render the report. Section order is fixed: header, test totals, system
/// info, service status, failures, next steps, credentials pointer.
///
/// Writes to a String are infallible, hence the discarded results.
pub fn render(
    checks: &CheckSummary,
    snapshot: &SystemSnapshot,
    site: &SiteConfig,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> Result<String> {
    let mut out = String::new();

    let _ = writeln!(out, "==============================================");
    let _ = writeln!(out, " PALISADE VERIFICATION REPORT");
    let _ = writeln!(out, "==============================================");
    let _ = writeln!(out, "Domain:       {}", site.get("domain")?);
    let _ = writeln!(out, "Host:         {}", site.host_fqdn()?);
    let _ = writeln!(out, "Install date: {}", site.get("install_date")?);
    let _ = writeln!(
        out,
        "Run:          {} .. {}",
        started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Test Totals ---");
    let _ = writeln!(out, "Checks passed: {}", checks.passed);
    let _ = writeln!(out, "Checks failed: {}", checks.failed);
    let _ = writeln!(out, "Warnings:      {}", checks.warnings);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- System Info ---");
    let _ = writeln!(out, "OS:       {}", snapshot.os);
    let _ = writeln!(out, "Kernel:   {}", snapshot.kernel);
    let _ = writeln!(out, "SELinux:  {}", snapshot.selinux_mode);
    let _ = writeln!(out, "Firewall: {}", snapshot.firewall_state);
    let _ = writeln!(out, "Disk:     {} free", snapshot.free_disk);
    let _ = writeln!(out, "Memory:   {} free", snapshot.free_memory);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Service Status ---");
    for (service, active) in &snapshot.services {
        let state = if *active { "active" } else { "inactive" };
        let _ = writeln!(out, "{:<14} {}", service, state);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Failures ---");
    if checks.failure_labels.is_empty() {
        let _ = writeln!(out, "{}", NO_FAILURES_SENTINEL);
    } else {
        for label in &checks.failure_labels {
            let _ = writeln!(out, "- {}", label);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Next Steps ---");
    let _ = writeln!(out, "1. Review any failures above and re-run 'palisade verify'");
    let _ = writeln!(out, "   after remediation.");
    let _ = writeln!(out, "2. Enroll client hosts against the identity service.");
    let _ = writeln!(out, "3. Point stack hosts' syslog at this host, TCP port 514.");
    let _ = writeln!(out, "4. Deploy SIEM agents and confirm they register.");
    let _ = writeln!(out, "5. Rotate the administrative credentials.");
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Credentials file: {}/credentials.txt (owner-only; rotate after first login)",
        site.get("install_root")?
    );

    Ok(out)
}

/// Write the rendered report to
/// `<install_root>/VERIFICATION_REPORT_<install_date>.txt`, owner
/// read/write only regardless of umask.
pub fn persist(artifact: &str, site: &SiteConfig) -> Result<PathBuf> {
    let install_root = site.get_path("install_root")?;
    let path = install_root.join(format!(
        "VERIFICATION_REPORT_{}.txt",
        site.get("install_date")?
    ));

    let write = || -> std::io::Result<()> {
        fs::create_dir_all(&install_root)?;
        fs::write(&path, artifact)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // fs::write creates with umask-derived mode; tighten after.
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    };

    write().map_err(|source| PalisadeError::ReportIo {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
