//! Shared test utilities for API integration tests.

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use ph_api::ApplianceClient;
use ph_core::config::ApiConfig;

/// Host every mock server is reached through.
pub const HOST: &str = "127.0.0.1";

/// Start a mock appliance.
pub async fn mock_appliance() -> ServerGuard {
    Server::new_async().await
}

/// API settings pointing at `server` over plain HTTP.
pub fn api_config_for(server: &ServerGuard) -> ApiConfig {
    let host_with_port = server.host_with_port();
    let port = host_with_port
        .rsplit_once(':')
        .and_then(|(_, p)| p.parse().ok())
        .expect("mock server port");
    ApiConfig {
        scheme: "http".into(),
        port: Some(port),
        verify_tls: false,
        timeout_secs: 5,
        long_timeout_secs: 5,
    }
}

pub fn client_for(server: &ServerGuard) -> ApplianceClient {
    ApplianceClient::new(&api_config_for(server)).expect("client")
}

/// API settings pointing at a port nothing listens on.
pub fn unreachable_config() -> ApiConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    ApiConfig {
        scheme: "http".into(),
        port: Some(port),
        verify_tls: false,
        timeout_secs: 5,
        long_timeout_secs: 5,
    }
}

/// Mock a successful login returning `sid`.
pub async fn mock_login(server: &mut ServerGuard, password: &str, sid: &str) -> Mock {
    server
        .mock("POST", "/api/auth")
        .match_body(Matcher::Json(serde_json::json!({ "password": password })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "session": { "valid": true, "sid": sid, "validity": 1800 } })
                .to_string(),
        )
        .create_async()
        .await
}

/// Query matcher for an authenticated request carrying `sid`.
pub fn sid_query(sid: &str) -> Matcher {
    Matcher::UrlEncoded("sid".into(), sid.into())
}
