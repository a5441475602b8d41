//! Gravity (blocklist refresh) endpoint.

use reqwest::{Method, Response};
use tracing::debug;

use ph_core::constants::endpoints;
use ph_core::error::{PhError, PhResult};

use crate::session::Session;

impl Session {
    /// Trigger a gravity update and wait until the appliance has finished
    /// streaming its output.
    ///
    /// Success is decided by the HTTP status and a complete body; the body
    /// itself is not inspected. The long timeout bounds the whole exchange.
    pub async fn update_gravity(&self) -> PhResult<()> {
        let url = self.endpoint(endpoints::GRAVITY);
        debug!("POST {}{}", self.api_url(), endpoints::GRAVITY);

        let response = self
            .client()
            .build_request(Method::POST, &url, self.client().long_timeout(), None)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| PhError::gravity_update_with("failed to update gravity", e.without_url()))?;

        let output = response
            .bytes()
            .await
            .map_err(|e| PhError::gravity_update_with("failed to update gravity", e.without_url()))?;
        debug!("gravity output: {} bytes", output.len());

        Ok(())
    }
}
