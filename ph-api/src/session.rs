//! Authenticated session with a single appliance.

use std::fmt;

use reqwest::{Method, Response};
use tracing::debug;

use ph_core::constants::endpoints;
use ph_core::error::{PhError, PhResult};

use crate::client::{display_url, ApplianceClient};

/// One authenticated context with one appliance.
///
/// Only [`ApplianceClient::login`] creates a `Session`, so holding one means
/// the appliance accepted the password. [`Session::logout`] consumes it.
pub struct Session {
    client: ApplianceClient,
    host: String,
    /// API root, e.g. `https://192.168.1.2/api`.
    api_url: String,
    /// Token as issued by the appliance.
    sid: String,
    /// Token percent-encoded once, appended to every request.
    encoded_sid: String,
}

impl Session {
    pub(crate) fn new(client: ApplianceClient, host: &str, api_url: String, sid: String) -> Self {
        let encoded_sid = urlencoding::encode(&sid).into_owned();
        Self {
            client,
            host: host.to_string(),
            api_url,
            sid,
            encoded_sid,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn encoded_sid(&self) -> &str {
        &self.encoded_sid
    }

    pub(crate) fn client(&self) -> &ApplianceClient {
        &self.client
    }

    /// Full authenticated URL for an endpoint path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}?sid={}", self.api_url, path, self.encoded_sid)
    }

    /// Terminate the session. Returns the response body text.
    ///
    /// Runs in cleanup paths, so callers log a failure instead of
    /// propagating it.
    pub async fn logout(self) -> PhResult<String> {
        let url = self.endpoint(endpoints::AUTH);
        let target = display_url(&url);
        debug!("DELETE {target}");

        let response = self
            .client
            .build_request(Method::DELETE, &url, self.client.timeout(), None)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| PhError::api_with(format!("failed to logout from {target}"), e.without_url()))?;

        response
            .text()
            .await
            .map_err(|e| PhError::api_with(format!("failed to read response from {target}"), e.without_url()))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("api_url", &self.api_url)
            .field("sid", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::config::ApiConfig;

    fn session(sid: &str) -> Session {
        let client = ApplianceClient::new(&ApiConfig::default()).unwrap();
        let api_url = client.api_url("192.168.1.2");
        Session::new(client, "192.168.1.2", api_url, sid.to_string())
    }

    #[test]
    fn test_sid_is_encoded_once() {
        let s = session("hello World!");
        assert_eq!(s.sid(), "hello World!");
        assert_eq!(s.encoded_sid(), "hello%20World%21");
        assert_eq!(
            s.endpoint("/teleporter"),
            "https://192.168.1.2/api/teleporter?sid=hello%20World%21"
        );
    }

    #[test]
    fn test_base64_sid_is_escaped() {
        let s = session("vFA+EP4MQ5JJvJg+3Q2Jnw=");
        assert_eq!(s.encoded_sid(), "vFA%2BEP4MQ5JJvJg%2B3Q2Jnw%3D");
    }

    #[test]
    fn test_debug_redacts_sid() {
        let printed = format!("{:?}", session("topsecret"));
        assert!(!printed.contains("topsecret"));
        assert!(printed.contains("192.168.1.2"));
    }
}
