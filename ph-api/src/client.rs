//! HTTP client for the appliance REST API.
//!
//! Handles transport settings (scheme, port, timeouts, TLS verification),
//! the generic JSON request primitive, and password login.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::debug;

use ph_core::config::ApiConfig;
use ph_core::constants::{self, endpoints};
use ph_core::error::{PhError, PhResult};

use crate::response::AuthResponse;
use crate::session::Session;

/// Stateless client for one or more appliances.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApplianceClient {
    inner: Client,
    /// URL scheme, "https" or "http".
    scheme: String,
    /// Port override applied to every host.
    port: Option<u16>,
    /// Timeout for light requests.
    timeout: Duration,
    /// Timeout for teleporter export and gravity update.
    long_timeout: Duration,
}

impl ApplianceClient {
    /// Create a new client from API configuration.
    pub fn new(config: &ApiConfig) -> PhResult<Self> {
        let scheme = config.scheme.trim().to_ascii_lowercase();
        if scheme != "https" && scheme != "http" {
            return Err(PhError::conf_validation(format!(
                "unsupported scheme: {}",
                config.scheme
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(constants::CONNECT_TIMEOUT_SECS));

        // Appliances on the local network usually serve self-signed certificates
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| PhError::api_with("failed to build HTTP client", e))?;

        Ok(Self {
            inner,
            scheme,
            port: config.port,
            timeout,
            long_timeout: Duration::from_secs(config.long_timeout_secs),
        })
    }

    /// API root for a host, e.g. `https://192.168.1.2/api`.
    pub fn api_url(&self, host: &str) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{}", self.scheme, host, port, constants::API_PREFIX),
            None => format!("{}://{}{}", self.scheme, host, constants::API_PREFIX),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn long_timeout(&self) -> Duration {
        self.long_timeout
    }

    /// Build a request for the given method, URL, timeout, and optional JSON body.
    pub(crate) fn build_request(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let mut builder = self.inner.request(method, url).timeout(timeout);
        if let Some(b) = body {
            builder = builder.json(b);
        }
        builder
    }

    /// Send a request and parse the response body as JSON.
    ///
    /// Transport failures, HTTP error statuses and malformed bodies all
    /// surface as [`PhError::Api`]; the message tells them apart.
    pub async fn send_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> PhResult<Value> {
        let target = display_url(url);
        debug!("{} {}", method, target);

        let response = self
            .build_request(method, url, self.timeout, body)
            .send()
            .await
            .map_err(|e| PhError::api_with(format!("failed to send request to {target}"), e.without_url()))?;

        let status = response.status();
        let response = response
            .error_for_status()
            .map_err(|e| PhError::api_with(format!("{target} returned HTTP {status}"), e.without_url()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PhError::api_with(format!("failed to read response from {target}"), e.without_url()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| PhError::api_with(format!("invalid JSON response from {target}"), e))
    }

    /// Authenticate against `host` with the web interface password.
    pub async fn login(&self, host: &str, password: &str) -> PhResult<Session> {
        let api_url = self.api_url(host);
        let auth_url = format!("{api_url}{}", endpoints::AUTH);
        let body = json!({ "password": password });

        let value = self
            .send_request(Method::POST, &auth_url, Some(&body))
            .await
            .map_err(|e| PhError::api_with(format!("failed to login to {auth_url}"), e))?;

        let sid = session_token(value)
            .ok_or_else(|| PhError::api("login response missing session token"))?;

        debug!("session established with {host}");
        Ok(Session::new(self.clone(), host, api_url, sid))
    }
}

/// Extract `session.sid` from a login response.
fn session_token(value: Value) -> Option<String> {
    serde_json::from_value::<AuthResponse>(value)
        .ok()
        .and_then(|r| r.session.sid)
        .filter(|sid| !sid.is_empty())
}

/// Strip the query string so session tokens never reach error messages or logs.
pub(crate) fn display_url(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
