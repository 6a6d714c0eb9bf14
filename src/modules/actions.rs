//! Module actions: the apply steps behind each provisioning module.
//!
//! Every action follows the same shape: resolve the site variables it
//! needs up front (a missing variable fails the module before any host
//! side effect), then run check-then-apply steps through the
//! [`CommandRunner`] seam. The check half is what makes a module
//! idempotent: an already-provisioned target passes every check and the
//! apply commands never run. The literal command bodies are host plumbing;
//! the contract is only that each step either converges or fails.

use crate::error::{PalisadeError, Result};
use crate::modules::ModuleKind;
use crate::orchestrator::readiness::Readiness;
use crate::shell::CommandRunner;
use crate::site::SiteConfig;
use tracing::debug;

/// Shared inputs for one module action.
pub struct ActionContext<'a> {
    pub site: &'a SiteConfig,
    pub runner: &'a dyn CommandRunner,
    pub readiness: Readiness,
}

impl<'a> ActionContext<'a> {
    /// Run one idempotent apply step: skip if `check` already holds,
    /// otherwise run `apply` and fail the module if it does not succeed.
    /// Returns whether the apply command ran.
    fn step(&self, module: &str, check: &str, apply: &str) -> Result<bool> {
        if self.runner.probe(check) {
            debug!("{}: already satisfied: {}", module, check);
            return Ok(false);
        }

        let result = self.runner.run(apply)?;
        if !result.success {
            return Err(PalisadeError::ModuleFailure {
                module: module.to_string(),
                message: format!(
                    "'{}' exited with code {:?}: {}",
                    apply,
                    result.exit_code,
                    result.stderr.trim()
                ),
            });
        }
        Ok(true)
    }

    /// Start and enable a service, then poll until it reports active.
    fn ensure_service(&self, module: &str, service: &str) -> Result<()> {
        self.step(
            module,
            &format!("systemctl is-enabled --quiet {}", service),
            &format!("systemctl enable {}", service),
        )?;
        self.step(
            module,
            &format!("systemctl is-active --quiet {}", service),
            &format!("systemctl start {}", service),
        )?;

        let probe = format!("systemctl is-active --quiet {}", service);
        if !self.readiness.wait(|| self.runner.probe(&probe)) {
            return Err(PalisadeError::ModuleFailure {
                module: module.to_string(),
                message: format!("service '{}' did not become active", service),
            });
        }
        Ok(())
    }
}

/// Execute the action for one provisioning module.
///
/// The verification module is not handled here: it is terminal and
/// produces check counts, so the orchestrator dispatches it directly to
/// the verifier.
pub fn run(kind: ModuleKind, ctx: &ActionContext<'_>) -> Result<()> {
    match kind {
        ModuleKind::SystemPrep => system_prep(ctx),
        ModuleKind::NetworkIdentity => network_identity(ctx),
        ModuleKind::Firewall => firewall(ctx),
        ModuleKind::IdentityService => identity_service(ctx),
        ModuleKind::LogAggregation => log_aggregation(ctx),
        ModuleKind::Siem => siem(ctx),
        ModuleKind::Verification => Err(PalisadeError::ModuleFailure {
            module: kind.name().to_string(),
            message: "verification is dispatched by the orchestrator".to_string(),
        }),
    }
}

fn system_prep(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::SystemPrep.name();
    let timezone = ctx.site.get("timezone")?;

    ctx.step(
        name,
        &format!(
            "timedatectl show --property=Timezone --value | grep -qx '{}'",
            timezone
        ),
        &format!("timedatectl set-timezone '{}'", timezone),
    )?;

    // Base tooling every later module and check assumes.
    for package in ["chrony", "openssl", "bind-utils"] {
        ctx.step(
            name,
            &format!("rpm -q {}", package),
            &format!("dnf -y install {}", package),
        )?;
    }

    ctx.ensure_service(name, "chronyd")
}

fn network_identity(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::NetworkIdentity.name();
    let fqdn = ctx.site.host_fqdn()?;
    let address = ctx.site.get("host_address")?;
    let host = ctx.site.get("host_name")?;

    ctx.step(
        name,
        &format!("hostname -f | grep -qx '{}'", fqdn),
        &format!("hostnamectl set-hostname '{}'", fqdn),
    )?;

    // FreeIPA requires the primary host resolvable through /etc/hosts even
    // before its own DNS is up.
    ctx.step(
        name,
        &format!("grep -q '{} {} {}' /etc/hosts", address, fqdn, host),
        &format!("echo '{} {} {}' >> /etc/hosts", address, fqdn, host),
    )?;
    Ok(())
}

fn firewall(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::Firewall.name();

    ctx.step(name, "rpm -q firewalld", "dnf -y install firewalld")?;
    ctx.ensure_service(name, "firewalld")
}

fn identity_service(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::IdentityService.name();
    let domain = ctx.site.get("domain")?;
    let realm = domain.to_uppercase();
    let fqdn = ctx.site.host_fqdn()?;
    let admin_password = ctx.site.get("admin_password")?;
    let directory_password = ctx.site.get("directory_password")?;

    ctx.step(name, "rpm -q ipa-server", "dnf -y install ipa-server")?;

    // ipa-server-install is not re-runnable; `ipactl status` succeeding
    // means a server is already configured on this host.
    ctx.step(
        name,
        "ipactl status",
        &format!(
            "ipa-server-install --unattended --domain '{}' --realm '{}' \
             --hostname '{}' --ds-password '{}' --admin-password '{}' \
             --no-ntp",
            domain, realm, fqdn, directory_password, admin_password
        ),
    )?;

    ctx.ensure_service(name, "ipa")
}

fn log_aggregation(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::LogAggregation.name();

    ctx.step(name, "rpm -q rsyslog", "dnf -y install rsyslog")?;

    // Central receiver drop-in: TCP 514 from stack hosts into per-host
    // files under /var/log/remote. Lines are printf arguments, not the
    // format, so the literal %HOSTNAME% template survives.
    let wrote_config = ctx.step(
        name,
        "test -f /etc/rsyslog.d/00-central.conf",
        "printf '%s\\n' \
         'module(load=\"imtcp\")' \
         'input(type=\"imtcp\" port=\"514\")' \
         '$template RemoteHost,\"/var/log/remote/%HOSTNAME%.log\"' \
         '*.* ?RemoteHost' \
         > /etc/rsyslog.d/00-central.conf",
    )?;

    ctx.step(
        name,
        "test -d /var/log/remote",
        "mkdir -p /var/log/remote && chmod 750 /var/log/remote",
    )?;

    // Config change only takes effect on restart. A converged re-run wrote
    // nothing, so it leaves the running daemon alone.
    if wrote_config {
        let restart = ctx.runner.run("systemctl restart rsyslog")?;
        if !restart.success {
            return Err(PalisadeError::ModuleFailure {
                module: name.to_string(),
                message: format!("rsyslog restart failed: {}", restart.stderr.trim()),
            });
        }
    }

    ctx.ensure_service(name, "rsyslog")
}

fn siem(ctx: &ActionContext<'_>) -> Result<()> {
    let name = ModuleKind::Siem.name();

    ctx.step(name, "rpm -q wazuh-manager", "dnf -y install wazuh-manager")?;
    ctx.ensure_service(name, "wazuh-manager")
}
