//! Site configuration: the environment store for one installation run.
//!
//! A [`SiteConfig`] is a flat key/value map loaded once from a YAML file
//! before the first module runs, and read-only for the rest of the run.
//! Every module and check receives it by reference; none mutates it. Tests
//! build one with [`SiteConfig::from_pairs`] instead of touching the real
//! host configuration.

use crate::error::{PalisadeError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys that must be present and non-empty before any module runs.
///
/// A missing key is a pre-flight failure: no partial provisioning happens
/// with incomplete site configuration.
pub const REQUIRED_KEYS: &[&str] = &[
    "domain",
    "host_name",
    "host_address",
    "admin_password",
    "directory_password",
    "ssl_cert_path",
    "ssl_key_path",
    "timezone",
    "install_root",
    "install_date",
];

/// Read-only site configuration for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SiteConfig {
    values: BTreeMap<String, String>,
}

impl SiteConfig {
    /// Load the site configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file doesn't exist and
    /// `ConfigParseError` if the YAML is not a flat string map.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PalisadeError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PalisadeError::Io(e)
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| PalisadeError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build a configuration from in-memory pairs. Test seam.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a site variable.
    ///
    /// An absent or empty value is `MissingConfig`: modules must fail on a
    /// missing variable before attempting any external action.
    pub fn get(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(PalisadeError::MissingConfig { key: key.into() }),
        }
    }

    /// Look up a site variable as a path.
    pub fn get_path(&self, key: &str) -> Result<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// Pre-flight validation: every required key present and non-empty.
    ///
    /// Returns the first missing key as `MissingConfig`.
    pub fn validate(&self) -> Result<()> {
        for key in REQUIRED_KEYS {
            self.get(key)?;
        }
        Ok(())
    }

    /// Fully qualified domain name of the primary host.
    pub fn host_fqdn(&self) -> Result<String> {
        Ok(format!("{}.{}", self.get("host_name")?, self.get("domain")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub fn complete_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("domain", "corp.example.com"),
            ("host_name", "ipa1"),
            ("host_address", "10.0.10.5"),
            ("admin_password", "hunter2hunter2"),
            ("directory_password", "hunter2hunter2"),
            ("ssl_cert_path", "/etc/pki/tls/certs/ipa1.crt"),
            ("ssl_key_path", "/etc/pki/tls/private/ipa1.key"),
            ("timezone", "UTC"),
            ("install_root", "/opt/palisade"),
            ("install_date", "2026-08-27"),
        ]
    }

    #[test]
    fn load_reads_flat_yaml_map() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.yml");
        fs::write(&path, "domain: corp.example.com\nhost_name: ipa1\n").unwrap();

        let site = SiteConfig::load(&path).unwrap();
        assert_eq!(site.get("domain").unwrap(), "corp.example.com");
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let err = SiteConfig::load(&temp.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, PalisadeError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_malformed_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.yml");
        fs::write(&path, "domain: [nested, list]\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, PalisadeError::ConfigParseError { .. }));
    }

    #[test]
    fn get_missing_key_is_missing_config() {
        let site = SiteConfig::from_pairs([("domain", "corp.example.com")]);
        let err = site.get("timezone").unwrap_err();
        assert!(matches!(err, PalisadeError::MissingConfig { key } if key == "timezone"));
    }

    #[test]
    fn get_empty_value_is_missing_config() {
        let site = SiteConfig::from_pairs([("domain", "  ")]);
        assert!(site.get("domain").is_err());
    }

    #[test]
    fn validate_accepts_complete_config() {
        let site = SiteConfig::from_pairs(complete_pairs());
        assert!(site.validate().is_ok());
    }

    #[test]
    fn validate_rejects_incomplete_config() {
        let mut pairs = complete_pairs();
        pairs.retain(|(k, _)| *k != "admin_password");
        let site = SiteConfig::from_pairs(pairs);

        let err = site.validate().unwrap_err();
        assert!(matches!(err, PalisadeError::MissingConfig { key } if key == "admin_password"));
    }

    #[test]
    fn host_fqdn_joins_host_and_domain() {
        let site = SiteConfig::from_pairs(complete_pairs());
        assert_eq!(site.host_fqdn().unwrap(), "ipa1.corp.example.com");
    }
}
