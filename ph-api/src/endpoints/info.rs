//! Version, DNS blocking and configuration endpoints.

use reqwest::Method;
use serde_json::Value;

use ph_core::constants::endpoints;
use ph_core::error::{PhError, PhResult};

use crate::response::{extract_field, BlockingRequest, BlockingStatus};
use crate::session::Session;

impl Session {
    /// Component versions reported by the appliance (`version` field).
    pub async fn get_version(&self) -> PhResult<Value> {
        let url = self.endpoint(endpoints::VERSION);
        let value = self.client().send_request(Method::GET, &url, None).await?;
        extract_field(value, "version", &url)
    }

    /// Current DNS blocking state.
    pub async fn get_blocking_status(&self) -> PhResult<BlockingStatus> {
        let url = self.endpoint(endpoints::BLOCKING);
        let value = self.client().send_request(Method::GET, &url, None).await?;
        parse_blocking(extract_field(value, "blocking", &url)?)
    }

    /// Change the DNS blocking state. Returns the state the appliance reports
    /// after the change.
    pub async fn set_blocking_status(&self, request: BlockingRequest) -> PhResult<BlockingStatus> {
        let url = self.endpoint(endpoints::BLOCKING);
        let body = serde_json::to_value(request)
            .map_err(|e| PhError::api_with("failed to encode blocking request", e))?;
        let value = self
            .client()
            .send_request(Method::POST, &url, Some(&body))
            .await?;
        parse_blocking(extract_field(value, "blocking", &url)?)
    }

    /// Full appliance configuration, as returned.
    pub async fn get_config(&self) -> PhResult<Value> {
        let url = self.endpoint(endpoints::CONFIG);
        self.client().send_request(Method::GET, &url, None).await
    }
}

fn parse_blocking(value: Value) -> PhResult<BlockingStatus> {
    serde_json::from_value(value).map_err(|e| PhError::api_with("unexpected blocking state", e))
}
