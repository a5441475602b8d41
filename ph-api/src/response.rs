//! Appliance response and request bodies.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ph_core::error::{PhError, PhResult};

use crate::client::display_url;

/// Body of a `POST /api/auth` response.
///
/// ```json
/// { "session": { "valid": true, "sid": "vFA+EP4MQ5JJvJg+3Q2Jnw=", "validity": 1800 } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub session: AuthSession,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(default)]
    pub valid: bool,
    /// Session token. Null when the appliance has no password set.
    #[serde(default)]
    pub sid: Option<String>,
    /// Seconds until the session expires.
    #[serde(default)]
    pub validity: Option<i64>,
}

/// DNS blocking state reported by `/api/dns/blocking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockingStatus {
    Enabled,
    Disabled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BlockingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "enabled"),
            Self::Disabled => write!(f, "disabled"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Body of a `POST /api/dns/blocking` request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockingRequest {
    /// Desired blocking state.
    pub blocking: bool,
    /// Seconds after which the state reverts. `None` makes the change permanent.
    pub timer: Option<u64>,
}

impl BlockingRequest {
    pub fn enable() -> Self {
        Self {
            blocking: true,
            timer: None,
        }
    }

    pub fn disable(timer: Option<u64>) -> Self {
        Self {
            blocking: false,
            timer,
        }
    }
}

/// Take a named top-level field out of a JSON object response.
pub(crate) fn extract_field(mut value: Value, field: &str, url: &str) -> PhResult<Value> {
    value
        .as_object_mut()
        .and_then(|obj| obj.remove(field))
        .ok_or_else(|| {
            PhError::api(format!(
                "response from {} missing field '{field}'",
                display_url(url)
            ))
        })
}
