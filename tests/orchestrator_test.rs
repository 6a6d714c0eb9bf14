//! Integration tests for the orchestration and verification pipeline,
//! driven through the public API with scripted runners.

use palisade::modules::{ModuleOutcome, ModuleSet};
use palisade::orchestrator::readiness::Readiness;
use palisade::orchestrator::{verify_only, Orchestrator};
use palisade::shell::fake::FakeRunner;
use palisade::site::SiteConfig;
use palisade::ui::OutputMode;
use palisade::verify;
use tempfile::TempDir;

fn site(install_root: &str) -> SiteConfig {
    SiteConfig::from_pairs([
        ("domain", "corp.example.com"),
        ("host_name", "ipa1"),
        ("host_address", "10.0.10.5"),
        ("admin_password", "hunter2hunter2"),
        ("directory_password", "hunter2hunter2"),
        ("ssl_cert_path", "/etc/pki/tls/certs/ipa1.crt"),
        ("ssl_key_path", "/etc/pki/tls/private/ipa1.key"),
        ("timezone", "UTC"),
        ("install_root", install_root),
        ("install_date", "2026-08-27"),
    ])
}

fn healthy_runner() -> FakeRunner {
    FakeRunner::succeeding()
        .respond("getenforce", "Enforcing")
        .respond("df --output=avail", "42")
        .respond("free -m", "4096")
}

fn run(site: &SiteConfig, runner: &FakeRunner) -> palisade::orchestrator::RunReport {
    Orchestrator::new(site, runner)
        .with_readiness(Readiness::immediate(2))
        .with_output(OutputMode::Quiet)
        .run(&ModuleSet::catalog())
        .unwrap()
}

#[test]
fn exit_status_zero_iff_modules_and_checks_clean() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());

    // All clean: zero.
    let clean = run(&site, &healthy_runner());
    assert_eq!(clean.exit_code(), 0);

    // Module failure: non-zero.
    let module_fail = run(
        &site,
        &healthy_runner()
            .fail_on("rpm -q rsyslog")
            .fail_on("dnf -y install rsyslog"),
    );
    assert_eq!(module_fail.exit_code(), 1);

    // Hard check failure with clean modules: non-zero.
    let check_fail = run(&site, &healthy_runner().fail_on("openssl x509 -checkend"));
    assert!(check_fail.modules.iter().all(|(_, o)| o.is_success()));
    assert_eq!(check_fail.exit_code(), 1);
}

#[test]
fn failed_module_aborts_everything_downstream() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());

    // identity-service fails: log-aggregation, siem, verification must not
    // execute even though they are logically independent of each other.
    let runner = healthy_runner()
        .fail_on("rpm -q ipa-server")
        .fail_on("dnf -y install ipa-server");

    let report = run(&site, &runner);

    let outcomes: Vec<(&str, &ModuleOutcome)> = report
        .modules
        .iter()
        .map(|(n, o)| (n.as_str(), o))
        .collect();

    let position = |name: &str| outcomes.iter().position(|(n, _)| *n == name).unwrap();

    for (name, outcome) in &outcomes {
        match position(name).cmp(&position("identity-service")) {
            std::cmp::Ordering::Less => assert!(outcome.is_success()),
            std::cmp::Ordering::Equal => {
                assert!(matches!(outcome, ModuleOutcome::Failed(_)))
            }
            std::cmp::Ordering::Greater => {
                assert!(matches!(outcome, ModuleOutcome::Skipped(_)))
            }
        }
    }

    assert!(!runner.saw("rsyslog.d"));
    assert!(!runner.saw("wazuh"));
    assert_eq!(report.checks.passed + report.checks.failed, 0);
}

#[test]
fn verifier_counts_account_for_every_check() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());
    let battery_size = verify::battery(&site).unwrap().len() as u32;

    // One mid-battery failure must not stop later checks.
    let runner = healthy_runner().fail_on("is-active --quiet wazuh-manager");
    let report = verify_only(&site, &runner, OutputMode::Quiet).unwrap();

    assert_eq!(
        report.checks.passed + report.checks.failed + report.checks.warnings,
        battery_size
    );
    assert!(report
        .checks
        .failure_labels
        .contains(&"SIEM manager service".to_string()));
}

#[test]
fn full_rerun_against_provisioned_host_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());
    let runner = healthy_runner();

    let first = run(&site, &runner);
    let second = run(&site, &runner);

    assert!(first.success());
    assert!(second.success());
    // Check-then-apply: an already-provisioned target never re-applies.
    assert_eq!(runner.count("dnf -y install"), 0);
    assert_eq!(runner.count("ipa-server-install"), 0);
    assert_eq!(runner.count("hostnamectl set-hostname"), 0);
    assert_eq!(runner.count("systemctl restart rsyslog"), 0);
}

#[test]
fn persisted_report_reflects_check_failures() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());

    let runner = healthy_runner().fail_on("is-active --quiet ipa");
    let report = run(&site, &runner);

    let path = report.report_path.expect("report persisted");
    let text = std::fs::read_to_string(path).unwrap();

    assert!(text.contains("- FreeIPA service"));
    assert!(!text.contains("None - All tests passed!"));
}

#[test]
fn clean_report_carries_the_sentinel() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());

    let report = run(&site, &healthy_runner());

    let path = report.report_path.expect("report persisted");
    let text = std::fs::read_to_string(path).unwrap();

    assert!(text.contains("None - All tests passed!"));
}

#[test]
fn auth_check_tears_down_session_in_full_run() {
    let temp = TempDir::new().unwrap();
    let site = site(temp.path().to_str().unwrap());

    let pass = healthy_runner();
    run(&site, &pass);
    assert_eq!(pass.count("kinit"), 1);
    assert_eq!(pass.count("kdestroy"), 1);

    let fail = healthy_runner().fail_on("kinit");
    run(&site, &fail);
    assert_eq!(fail.count("kdestroy"), 1);
}
