//! Verification probes.
//!
//! A [`Probe`] is one capability-typed condition evaluated against the
//! host through the [`CommandRunner`] seam. The set is closed: the
//! verifier's battery is declarative data over these variants, which keeps
//! it table-testable. A probe whose underlying tool is missing or not
//! permitted evaluates the same as a false condition.

use crate::shell::CommandRunner;

/// One verification condition.
#[derive(Debug, Clone)]
pub enum Probe {
    /// systemd unit currently active.
    ServiceActive { service: String },

    /// systemd unit enabled at boot.
    ServiceEnabled { service: String },

    /// Regular file present on the host.
    FileExists { path: String },

    /// Hostname resolves through the configured resolver.
    DnsResolves { fqdn: String },

    /// Mandatory access control is enforcing (SELinux).
    SecurityModeEnforcing,

    /// Certificate valid for at least `min_days` more days.
    CertificateNotExpired { path: String, min_days: u32 },

    /// Kerberos authentication round-trip. Acquires a ticket with the
    /// given credentials and destroys it again on both outcomes, so
    /// verification leaves no residual session.
    AuthRoundTrip { principal: String, password: String },

    /// Numeric command output at or above a minimum (resource headroom).
    ResourceThreshold { command: String, minimum: u64 },
}

impl Probe {
    /// Evaluate the probe. `true` means the condition holds.
    pub fn evaluate(&self, runner: &dyn CommandRunner) -> bool {
        match self {
            Probe::ServiceActive { service } => {
                runner.probe(&format!("systemctl is-active --quiet {}", service))
            }
            Probe::ServiceEnabled { service } => {
                runner.probe(&format!("systemctl is-enabled --quiet {}", service))
            }
            Probe::FileExists { path } => runner.probe(&format!("test -f '{}'", path)),
            Probe::DnsResolves { fqdn } => runner.probe(&format!("host -W 2 '{}'", fqdn)),
            Probe::SecurityModeEnforcing => {
                runner.capture("getenforce").as_deref() == Some("Enforcing")
            }
            Probe::CertificateNotExpired { path, min_days } => {
                let seconds = u64::from(*min_days) * 86_400;
                runner.probe(&format!(
                    "openssl x509 -checkend {} -noout -in '{}'",
                    seconds, path
                ))
            }
            Probe::AuthRoundTrip {
                principal,
                password,
            } => {
                // The password goes over stdin: interpolating it into the
                // command line would break on shell metacharacters and leak
                // it into process listings.
                let authed = runner
                    .run_with_input(&format!("kinit '{}'", principal), password)
                    .map(|r| r.success)
                    .unwrap_or(false);
                // Teardown runs on both outcomes. Its own failure does not
                // change the check: kdestroy fails when kinit never created
                // a ticket.
                let _ = runner.run("kdestroy -A");
                authed
            }
            Probe::ResourceThreshold { command, minimum } => runner
                .capture(command)
                .and_then(|out| out.split_whitespace().next()?.parse::<u64>().ok())
                .is_some_and(|value| value >= *minimum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fake::FakeRunner;

    #[test]
    fn service_active_maps_to_systemctl() {
        let runner = FakeRunner::failing().succeed_on("is-active --quiet rsyslog");

        let active = Probe::ServiceActive {
            service: "rsyslog".into(),
        };
        let inactive = Probe::ServiceActive {
            service: "wazuh-manager".into(),
        };

        assert!(active.evaluate(&runner));
        assert!(!inactive.evaluate(&runner));
    }

    #[test]
    fn security_mode_requires_enforcing_exactly() {
        let enforcing = FakeRunner::succeeding().respond("getenforce", "Enforcing\n");
        let permissive = FakeRunner::succeeding().respond("getenforce", "Permissive\n");

        assert!(Probe::SecurityModeEnforcing.evaluate(&enforcing));
        assert!(!Probe::SecurityModeEnforcing.evaluate(&permissive));
    }

    #[test]
    fn security_mode_tool_missing_is_fail() {
        // Probe error and condition-false are deliberately the same.
        let runner = FakeRunner::failing();
        assert!(!Probe::SecurityModeEnforcing.evaluate(&runner));
    }

    #[test]
    fn certificate_probe_converts_days_to_seconds() {
        let runner = FakeRunner::succeeding();
        let probe = Probe::CertificateNotExpired {
            path: "/etc/pki/tls/certs/host.crt".into(),
            min_days: 30,
        };
        assert!(probe.evaluate(&runner));
        assert!(runner.saw("-checkend 2592000"));
    }

    #[test]
    fn auth_round_trip_destroys_ticket_on_pass() {
        let runner = FakeRunner::succeeding();
        let probe = Probe::AuthRoundTrip {
            principal: "admin".into(),
            password: "hunter2".into(),
        };

        assert!(probe.evaluate(&runner));
        assert_eq!(runner.count("kdestroy"), 1);
    }

    #[test]
    fn auth_round_trip_destroys_ticket_on_fail() {
        let runner = FakeRunner::succeeding().fail_on("kinit");
        let probe = Probe::AuthRoundTrip {
            principal: "admin".into(),
            password: "hunter2".into(),
        };

        assert!(!probe.evaluate(&runner));
        assert_eq!(runner.count("kdestroy"), 1);
    }

    #[test]
    fn auth_password_travels_on_stdin_not_argv() {
        let runner = FakeRunner::succeeding();
        let password = "it's-a-tricky-one";
        let probe = Probe::AuthRoundTrip {
            principal: "admin@CORP.EXAMPLE.COM".into(),
            password: password.into(),
        };

        assert!(probe.evaluate(&runner));
        assert!(!runner.issued().iter().any(|c| c.contains(password)));
        assert_eq!(
            runner.inputs(),
            vec![(
                "kinit 'admin@CORP.EXAMPLE.COM'".to_string(),
                password.to_string()
            )]
        );
        assert_eq!(runner.count("kdestroy"), 1);
    }

    #[test]
    fn resource_threshold_parses_leading_number() {
        let runner = FakeRunner::succeeding().respond("free -m", "1843");
        let probe = Probe::ResourceThreshold {
            command: "free -m | awk '/^Mem:/{print $7}'".into(),
            minimum: 1024,
        };
        assert!(probe.evaluate(&runner));
    }

    #[test]
    fn resource_threshold_below_minimum_fails() {
        let runner = FakeRunner::succeeding().respond("free -m", "512");
        let probe = Probe::ResourceThreshold {
            command: "free -m | awk '/^Mem:/{print $7}'".into(),
            minimum: 1024,
        };
        assert!(!probe.evaluate(&runner));
    }

    #[test]
    fn resource_threshold_unparseable_output_fails() {
        let runner = FakeRunner::succeeding().respond("free -m", "total used free");
        let probe = Probe::ResourceThreshold {
            command: "free -m".into(),
            minimum: 1,
        };
        assert!(!probe.evaluate(&runner));
    }

    #[test]
    fn dns_probe_queries_fqdn() {
        let runner = FakeRunner::succeeding();
        let probe = Probe::DnsResolves {
            fqdn: "ipa1.corp.example.com".into(),
        };
        assert!(probe.evaluate(&runner));
        assert!(runner.saw("host -W 2 'ipa1.corp.example.com'"));
    }
}
