//! Live system snapshot for the verification report.
//!
//! Collected at render time, not cached from earlier in the run, so the
//! report shows the host as it is when the report is written. Values may
//! therefore differ from what a check observed moments earlier.

use crate::shell::CommandRunner;
use crate::verify::STACK_SERVICES;

/// Host state captured for the report's system-info and service-status
/// sections.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    pub os: String,
    pub kernel: String,
    pub selinux_mode: String,
    pub firewall_state: String,
    pub free_disk: String,
    pub free_memory: String,

    /// (service, active?) for each stack service.
    pub services: Vec<(String, bool)>,
}

fn capture_or_unknown(runner: &dyn CommandRunner, command: &str) -> String {
    runner
        .capture(command)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

impl SystemSnapshot {
    /// Collect the snapshot through the runner.
    ///
    /// Collection never fails: a probe that errors renders as "unknown"
    /// rather than blocking the report.
    pub fn collect(runner: &dyn CommandRunner) -> Self {
        let services = STACK_SERVICES
            .iter()
            .map(|(service, _)| {
                let active = runner.probe(&format!("systemctl is-active --quiet {}", service));
                ((*service).to_string(), active)
            })
            .collect();

        Self {
            os: capture_or_unknown(runner, ". /etc/os-release && echo \"$PRETTY_NAME\""),
            kernel: capture_or_unknown(runner, "uname -r"),
            selinux_mode: capture_or_unknown(runner, "getenforce"),
            firewall_state: capture_or_unknown(runner, "firewall-cmd --state"),
            free_disk: capture_or_unknown(runner, "df -h --output=avail / | tail -1"),
            free_memory: capture_or_unknown(runner, "free -h | awk '/^Mem:/{print $7}'"),
            services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fake::FakeRunner;

    #[test]
    fn collect_captures_host_facts() {
        let runner = FakeRunner::succeeding()
            .respond("os-release", "Rocky Linux 9.4 (Blue Onyx)")
            .respond("uname -r", "5.14.0-427.el9.x86_64")
            .respond("getenforce", "Enforcing")
            .respond("firewall-cmd --state", "running")
            .respond("df -h", "12G")
            .respond("free -h", "3.4Gi");

        let snapshot = SystemSnapshot::collect(&runner);

        assert_eq!(snapshot.os, "Rocky Linux 9.4 (Blue Onyx)");
        assert_eq!(snapshot.kernel, "5.14.0-427.el9.x86_64");
        assert_eq!(snapshot.selinux_mode, "Enforcing");
        assert_eq!(snapshot.firewall_state, "running");
        assert_eq!(snapshot.services.len(), STACK_SERVICES.len());
        assert!(snapshot.services.iter().all(|(_, active)| *active));
    }

    #[test]
    fn collect_degrades_to_unknown_on_probe_error() {
        let runner = FakeRunner::failing();
        let snapshot = SystemSnapshot::collect(&runner);

        assert_eq!(snapshot.os, "unknown");
        assert_eq!(snapshot.selinux_mode, "unknown");
        assert!(snapshot.services.iter().all(|(_, active)| !*active));
    }
}
