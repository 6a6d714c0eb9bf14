//! Verification: the check battery run against the provisioned stack.
//!
//! Unlike provisioning modules, which abort eagerly, verification always
//! evaluates every check. Its job is the complete diagnostic picture: an
//! operator remediating the host needs every failure in one pass, not the
//! first one.

pub mod probe;

use crate::error::Result;
use crate::shell::CommandRunner;
use crate::site::SiteConfig;
use crate::ui::OutputMode;
use console::style;
use tracing::{info, warn};

pub use probe::Probe;

/// Minimum remaining certificate lifetime before the validity check fails.
const CERT_MIN_DAYS: u32 = 30;

/// Soft resource floors: advisory, not disqualifying.
const MIN_FREE_DISK_GB: u64 = 5;
const MIN_FREE_MEMORY_MB: u64 = 1024;

/// Whether a check's failure counts toward verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Failure increments the failed count and lands in the report.
    Hard,

    /// Failure is logged as a warning only.
    Soft,
}

/// One labelled verification check.
#[derive(Debug, Clone)]
pub struct Check {
    /// Human label; appears in logs and the report's failure list.
    pub label: String,

    pub severity: Severity,

    pub probe: Probe,
}

impl Check {
    fn hard(label: &str, probe: Probe) -> Self {
        Self {
            label: label.to_string(),
            severity: Severity::Hard,
            probe,
        }
    }

    fn soft(label: &str, probe: Probe) -> Self {
        Self {
            label: label.to_string(),
            severity: Severity::Soft,
            probe,
        }
    }
}

/// Aggregated battery result.
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub passed: u32,
    pub failed: u32,
    pub warnings: u32,

    /// Labels of hard-failed checks, in battery order.
    pub failure_labels: Vec<String>,
}

impl CheckSummary {
    /// Verification succeeds when no hard check failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Stack services that must be both active and enabled at boot.
pub const STACK_SERVICES: &[(&str, &str)] = &[
    ("ipa", "FreeIPA service"),
    ("rsyslog", "Log aggregation service"),
    ("wazuh-manager", "SIEM manager service"),
    ("firewalld", "Host firewall"),
];

/// Build the fixed check battery for a site.
///
/// Declarative data over the closed probe set; fails `MissingConfig` if a
/// referenced site variable is absent.
pub fn battery(site: &SiteConfig) -> Result<Vec<Check>> {
    let fqdn = site.host_fqdn()?;
    let realm = site.get("domain")?.to_uppercase();
    let admin_password = site.get("admin_password")?;
    let cert_path = site.get("ssl_cert_path")?;

    let mut checks = Vec::new();

    for (service, label) in STACK_SERVICES {
        checks.push(Check::hard(
            label,
            Probe::ServiceActive {
                service: (*service).to_string(),
            },
        ));
    }
    for (service, label) in STACK_SERVICES {
        checks.push(Check::hard(
            &format!("{} enabled at boot", label),
            Probe::ServiceEnabled {
                service: (*service).to_string(),
            },
        ));
    }

    checks.push(Check::hard(
        "SELinux enforcing",
        Probe::SecurityModeEnforcing,
    ));
    checks.push(Check::hard(
        "DNS resolution",
        Probe::DnsResolves { fqdn },
    ));
    checks.push(Check::hard(
        "Kerberos authentication",
        Probe::AuthRoundTrip {
            principal: format!("admin@{}", realm),
            password: admin_password.to_string(),
        },
    ));
    checks.push(Check::hard(
        "SSL certificate present",
        Probe::FileExists {
            path: cert_path.to_string(),
        },
    ));
    checks.push(Check::hard(
        "SSL certificate validity",
        Probe::CertificateNotExpired {
            path: cert_path.to_string(),
            min_days: CERT_MIN_DAYS,
        },
    ));

    checks.push(Check::soft(
        "Free disk headroom",
        Probe::ResourceThreshold {
            command: "df --output=avail -BG / | tail -1 | tr -d 'G '".to_string(),
            minimum: MIN_FREE_DISK_GB,
        },
    ));
    checks.push(Check::soft(
        "Free memory headroom",
        Probe::ResourceThreshold {
            command: "free -m | awk '/^Mem:/{print $7}'".to_string(),
            minimum: MIN_FREE_MEMORY_MB,
        },
    ));

    Ok(checks)
}

/// Evaluate every check in the battery. No short-circuit: a failure never
/// prevents later checks from running. Status lines honor the output mode;
/// the tracing log records every outcome regardless.
pub fn run_battery(
    checks: &[Check],
    runner: &dyn CommandRunner,
    output: OutputMode,
) -> CheckSummary {
    let mut summary = CheckSummary::default();

    for check in checks {
        let holds = check.probe.evaluate(runner);

        match (holds, check.severity) {
            (true, _) => {
                summary.passed += 1;
                info!("check passed: {}", check.label);
                if !output.is_quiet() {
                    println!("  {} {}", style("✓").green(), check.label);
                }
            }
            (false, Severity::Hard) => {
                summary.failed += 1;
                summary.failure_labels.push(check.label.clone());
                warn!("check failed: {}", check.label);
                if !output.is_quiet() {
                    println!("  {} {}", style("✗").red(), check.label);
                }
            }
            (false, Severity::Soft) => {
                summary.warnings += 1;
                warn!("check warning: {}", check.label);
                if !output.is_quiet() {
                    println!("  {} {} (warning)", style("!").yellow(), check.label);
                }
            }
        }
    }

    summary
}
