//! Error types for pihole-keeper.
//!
//! Configuration-time failures and per-host operational failures are
//! unified into a single `PhError` enum. Operational variants keep the
//! underlying transport, parse or IO error reachable through `source()`.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Convenience type alias for Results using PhError.
pub type PhResult<T> = Result<T, PhError>;

/// Underlying cause carried by domain errors.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Unified error type covering configuration and appliance failures.
#[derive(Error, Debug)]
pub enum PhError {
    // -- Configuration errors --
    /// A required configuration value is missing or empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A configuration value is present but semantically invalid.
    #[error("invalid configuration: {message}")]
    ConfValidation {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A configuration value is not of the expected type.
    #[error("{field} must be a {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    // -- Appliance errors --
    /// Login, session or generic request failure.
    #[error("api error: {message}")]
    Api {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Teleporter export download or persistence failed.
    #[error("backup error: {message}")]
    Backup {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Gravity update trigger failed.
    #[error("gravity update error: {message}")]
    GravityUpdate {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    // -- Ambient --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Log sink could not be set up.
    #[error("logging error: {0}")]
    Logging(String),
}

/// Discriminant of a [`PhError`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    ConfValidation,
    TypeMismatch,
    Api,
    Backup,
    GravityUpdate,
    Io,
    Logging,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::ConfValidation => "conf_validation",
            Self::TypeMismatch => "type_mismatch",
            Self::Api => "api",
            Self::Backup => "backup",
            Self::GravityUpdate => "gravity_update",
            Self::Io => "io",
            Self::Logging => "logging",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PhError {
    pub fn conf_validation(message: impl Into<String>) -> Self {
        Self::ConfValidation {
            message: message.into(),
            source: None,
        }
    }

    pub fn conf_validation_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ConfValidation {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            source: None,
        }
    }

    pub fn api_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Api {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn backup_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Backup {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn gravity_update_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::GravityUpdate {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::ConfValidation { .. } => ErrorKind::ConfValidation,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::Api { .. } => ErrorKind::Api,
            Self::Backup { .. } => ErrorKind::Backup,
            Self::GravityUpdate { .. } => ErrorKind::GravityUpdate,
            Self::Io(_) => ErrorKind::Io,
            Self::Logging(_) => ErrorKind::Logging,
        }
    }

    /// Whether this error was raised while loading or validating configuration.
    /// These abort the whole run before any network activity.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::ConfValidation | ErrorKind::TypeMismatch
        )
    }
}

/// Render an error followed by its chain of causes, separated by `: `.
pub fn display_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        cause = inner.source();
    }
    out
}
