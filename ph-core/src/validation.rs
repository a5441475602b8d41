//! Validation of raw appliance inputs.
//!
//! Every field is checked before any network activity starts. A failure
//! here aborts the whole run; no partially validated configuration is ever
//! handed to the dispatcher.

use std::fmt;
use std::fs::OpenOptions;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::RawAppliance;
use crate::constants;
use crate::error::{PhError, PhResult};

/// Appliance inputs that passed validation.
#[derive(Clone)]
pub struct ValidatedConfig {
    password: String,
    hosts: Vec<String>,
    backup_dir: PathBuf,
}

impl ValidatedConfig {
    /// Validate password, hosts and backup directory, in that order.
    ///
    /// A missing backup directory falls back to [`constants::DEFAULT_BACKUP_DIR`].
    pub fn from_raw(raw: &RawAppliance) -> PhResult<Self> {
        let password = validate_password(raw.password.as_ref())?;
        let hosts = validate_hosts(raw.hosts.as_ref())?;

        let default_dir = toml::Value::String(constants::DEFAULT_BACKUP_DIR.to_string());
        let backup_dir = validate_backup_dir(Some(raw.backup_dir.as_ref().unwrap_or(&default_dir)))?;

        info!(
            "configuration loaded: hosts={:?}, backup_dir={}",
            hosts,
            backup_dir.display()
        );

        Ok(Self {
            password,
            hosts,
            backup_dir,
        })
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Validated hosts, in configured order.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Absolute, writable backup directory.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("password", &"<redacted>")
            .field("hosts", &self.hosts)
            .field("backup_dir", &self.backup_dir)
            .finish()
    }
}

/// Validate the appliance password. The value is returned untrimmed.
pub fn validate_password(raw: Option<&toml::Value>) -> PhResult<String> {
    let value = raw.ok_or_else(|| PhError::Configuration("password not set".into()))?;
    let password = expect_str("password", value)?;

    if password.trim().is_empty() {
        return Err(PhError::Configuration(
            "password can not be empty or whitespace only".into(),
        ));
    }

    Ok(password.to_string())
}

/// Validate the host list.
///
/// A string is split on commas; a TOML array must hold strings. Entries are
/// trimmed, blank entries dropped, and each must be a dotted-quad IPv4
/// address. Order and duplicates are preserved.
pub fn validate_hosts(raw: Option<&toml::Value>) -> PhResult<Vec<String>> {
    let entries: Vec<String> = match raw {
        None => return Err(PhError::Configuration("host list not set".into())),
        Some(toml::Value::String(s)) if s.is_empty() => {
            return Err(PhError::Configuration("host list not set".into()))
        }
        Some(toml::Value::Array(items)) if items.is_empty() => {
            return Err(PhError::Configuration("host list not set".into()))
        }
        Some(toml::Value::String(s)) => s.split(',').map(|h| h.trim().to_string()).collect(),
        Some(toml::Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| expect_str(&format!("hosts[{i}]"), item).map(|h| h.trim().to_string()))
            .collect::<PhResult<_>>()?,
        Some(other) => {
            return Err(PhError::TypeMismatch {
                field: "hosts".into(),
                expected: "string",
                found: other.type_str(),
            })
        }
    };

    let hosts: Vec<String> = entries.into_iter().filter(|h| !h.is_empty()).collect();
    if hosts.is_empty() {
        return Err(PhError::conf_validation(
            "host list must contain at least one address",
        ));
    }

    for host in &hosts {
        host.parse::<Ipv4Addr>()
            .map_err(|e| PhError::conf_validation_with(format!("invalid IP address: {host}"), e))?;
    }

    Ok(hosts)
}

/// Validate the backup directory and return its canonical absolute path.
///
/// `~` is expanded to the home directory and relative paths are resolved
/// against the working directory. The directory must already exist and
/// accept a freshly created probe file.
pub fn validate_backup_dir(raw: Option<&toml::Value>) -> PhResult<PathBuf> {
    let value = raw.ok_or_else(|| PhError::Configuration("backup directory not set".into()))?;
    let raw_path = expect_str("backup_dir", value)?;

    if raw_path.trim().is_empty() {
        return Err(PhError::Configuration(
            "backup directory can not be empty or whitespace only".into(),
        ));
    }

    let path = absolute(&expand_home(raw_path))?;
    if !path.is_dir() {
        return Err(PhError::conf_validation(format!(
            "path is not a directory: {}",
            path.display()
        )));
    }

    let path = path.canonicalize().map_err(|e| {
        PhError::conf_validation_with(format!("cannot resolve {}", path.display()), e)
    })?;

    probe_write_access(&path)?;
    Ok(path)
}

fn expect_str<'a>(field: &str, value: &'a toml::Value) -> PhResult<&'a str> {
    value.as_str().ok_or_else(|| PhError::TypeMismatch {
        field: field.to_string(),
        expected: "string",
        found: value.type_str(),
    })
}

fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

fn absolute(path: &Path) -> PhResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| PhError::conf_validation_with("cannot determine working directory", e))?;
    Ok(cwd.join(path))
}

/// Create then delete a sentinel file. Fails if the sentinel already exists.
fn probe_write_access(dir: &Path) -> PhResult<()> {
    let probe = dir.join(constants::WRITE_PROBE_FILE);
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .and_then(|_| std::fs::remove_file(&probe))
        .map_err(|e| PhError::conf_validation_with(format!("no write access to {}", dir.display()), e))
}
