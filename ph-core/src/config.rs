//! Application configuration.
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables and command-line flags. Appliance inputs (password, hosts,
//! backup directory) are kept as raw TOML values here; they only become
//! usable after passing through [`crate::validation`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PhError, PhResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Unvalidated appliance inputs.
    #[serde(default)]
    pub appliance: RawAppliance,

    /// HTTP transport settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raw appliance inputs, exactly as read from the file or environment.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RawAppliance {
    /// Web interface password of the appliances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<toml::Value>,

    /// Comma-delimited string or array of IPv4 addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<toml::Value>,

    /// Directory receiving teleporter archives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<toml::Value>,
}

impl fmt::Debug for RawAppliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawAppliance")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("hosts", &self.hosts)
            .field("backup_dir", &self.backup_dir)
            .finish()
    }
}

impl RawAppliance {
    /// Replace file values with values given on the command line or in the
    /// environment. `None` leaves the current value in place.
    pub fn apply_overrides(
        &mut self,
        password: Option<String>,
        hosts: Option<String>,
        backup_dir: Option<String>,
    ) {
        if let Some(password) = password {
            self.password = Some(toml::Value::String(password));
        }
        if let Some(hosts) = hosts {
            self.hosts = Some(toml::Value::String(hosts));
        }
        if let Some(dir) = backup_dir {
            self.backup_dir = Some(toml::Value::String(dir));
        }
    }
}

/// HTTP transport settings for talking to the appliances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// URL scheme, "https" or "http".
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Port override. The scheme's default port is used when unset.
    #[serde(default)]
    pub port: Option<u16>,

    /// Verify the appliance TLS certificate. Appliances usually serve a
    /// self-signed certificate on the local network, so this is off by default.
    #[serde(default)]
    pub verify_tls: bool,

    /// Timeout for login, logout and status requests, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Timeout for teleporter export and gravity update, in seconds.
    #[serde(default = "default_long_timeout")]
    pub long_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory holding the log file. Empty means the working directory.
    #[serde(default)]
    pub directory: String,

    /// Write the log file as JSON lines.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_scheme() -> String {
    "https".to_string()
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_long_timeout() -> u64 {
    constants::LONG_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            port: None,
            verify_tls: false,
            timeout_secs: default_timeout(),
            long_timeout_secs: default_long_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> PhResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PhError::conf_validation_with(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> PhResult<Self> {
        toml::from_str(contents)
            .map_err(|e| PhError::conf_validation_with("malformed configuration file", e))
    }

    /// Get the effective log directory, using the configured path or the
    /// working directory.
    pub fn effective_log_dir(&self) -> PhResult<PathBuf> {
        if self.logging.directory.trim().is_empty() {
            Ok(std::env::current_dir()?)
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}
