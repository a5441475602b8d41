//! Integration tests for the session lifecycle against a mock appliance.
//!
//! Covers login, the generic request primitive, teleporter export, gravity
//! update, status endpoints and logout.

mod common;

use common::{client_for, mock_appliance, mock_login, sid_query, HOST};
use mockito::Matcher;
use ph_api::{ApplianceClient, BlockingRequest, BlockingStatus};
use ph_core::config::ApiConfig;
use ph_core::error::{display_chain, PhError};
use reqwest::Method;
use std::error::Error;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ---- login ----

#[tokio::test]
async fn login_extracts_and_encodes_session_token() {
    let mut server = mock_appliance().await;
    let auth = mock_login(&mut server, "secret", "hello World!").await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();

    auth.assert_async().await;
    assert_eq!(session.host(), HOST);
    assert_eq!(session.sid(), "hello World!");
    assert_eq!(session.encoded_sid(), "hello%20World%21");
}

#[tokio::test]
async fn login_without_sid_is_api_error() {
    let mut server = mock_appliance().await;
    let _mock = server
        .mock("POST", "/api/auth")
        .with_status(200)
        .with_body(r#"{"session":{"valid":false,"sid":null}}"#)
        .create_async()
        .await;

    let err = client_for(&server).login(HOST, "secret").await.unwrap_err();
    assert!(matches!(err, PhError::Api { .. }));
    assert!(err.to_string().contains("missing session token"));
}

#[tokio::test]
async fn login_with_non_object_body_is_api_error() {
    let mut server = mock_appliance().await;
    let _mock = server
        .mock("POST", "/api/auth")
        .with_status(200)
        .with_body(r#"["not", "a", "session"]"#)
        .create_async()
        .await;

    let err = client_for(&server).login(HOST, "secret").await.unwrap_err();
    assert!(err.to_string().contains("missing session token"));
}

#[tokio::test]
async fn login_rejected_password_is_api_error_with_cause() {
    let mut server = mock_appliance().await;
    let _mock = server
        .mock("POST", "/api/auth")
        .with_status(401)
        .with_body(r#"{"error":{"key":"unauthorized"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).login(HOST, "wrong").await.unwrap_err();
    assert!(matches!(err, PhError::Api { .. }));
    assert!(err.to_string().contains("failed to login to"));
    assert!(display_chain(&err).contains("401"));
}

#[tokio::test]
async fn login_transport_failure_is_api_error_with_cause() {
    let client = ApplianceClient::new(&common::unreachable_config()).unwrap();

    let err = client.login(HOST, "secret").await.unwrap_err();
    assert!(matches!(err, PhError::Api { .. }));
    let cause = err.source().expect("transport cause");
    assert!(cause.to_string().contains("failed to send request to"));
}

// ---- send_request ----

#[tokio::test]
async fn send_request_rejects_invalid_json() {
    let mut server = mock_appliance().await;
    let _mock = server
        .mock("GET", "/api/config")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/config?sid=abc", client.api_url(HOST));
    let err = client.send_request(Method::GET, &url, None).await.unwrap_err();
    assert!(matches!(err, PhError::Api { .. }));
    assert!(err.to_string().contains("invalid JSON response"));
    assert!(!err.to_string().contains("sid=abc"));
}

#[tokio::test]
async fn send_request_reports_http_status() {
    let mut server = mock_appliance().await;
    let _mock = server
        .mock("GET", "/api/config")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    let url = format!("{}/config?sid=abc", client.api_url(HOST));
    let err = client.send_request(Method::GET, &url, None).await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

// ---- teleporter ----

#[tokio::test]
async fn get_backup_writes_exact_response_bytes() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let archive: &[u8] = b"PK\x03\x04teleporter-archive";
    let export = server
        .mock("GET", "/api/teleporter")
        .match_query(sid_query("s1d"))
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(archive)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let path = session.get_backup(dir.path()).await.unwrap();

    export.assert_async().await;
    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("127.0.0.1_"), "{name}");
    assert!(name.ends_with("_backup.zip"), "{name}");
    // 127.0.0.1_YYYYMMDD_HHMMSS_backup.zip
    assert_eq!(name.len(), "127.0.0.1_".len() + 15 + "_backup.zip".len());
    assert_eq!(std::fs::read(&path).unwrap(), archive);
}

#[tokio::test]
async fn get_backup_download_failure_has_no_side_effects() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("GET", "/api/teleporter")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("not-yet-created");
    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let err = session.get_backup(&target).await.unwrap_err();

    assert!(matches!(err, PhError::Backup { .. }));
    assert!(err.to_string().contains("failed to download"));
    assert!(!target.exists());
}

#[tokio::test]
async fn get_backup_directory_failure_writes_nothing() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("GET", "/api/teleporter")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("zip")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let err = session.get_backup(&blocker.join("backups")).await.unwrap_err();

    assert!(matches!(err, PhError::Backup { .. }));
    assert!(err.to_string().contains("cannot create directory"));
    assert_eq!(std::fs::read(&blocker).unwrap(), b"x");
}

// ---- gravity ----

#[tokio::test]
async fn update_gravity_succeeds_on_200() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let gravity = server
        .mock("POST", "/api/action/gravity")
        .match_query(sid_query("s1d"))
        .with_status(200)
        .with_body("  [i] Neutrino emissions detected...\n")
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    session.update_gravity().await.unwrap();
    gravity.assert_async().await;
}

#[tokio::test]
async fn update_gravity_http_error_is_gravity_error() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("POST", "/api/action/gravity")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let err = session.update_gravity().await.unwrap_err();
    assert!(matches!(err, PhError::GravityUpdate { .. }));
    assert!(err.source().is_some());
}

#[tokio::test]
async fn update_gravity_waits_for_streamed_output() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("POST", "/api/action/gravity")
        .match_query(sid_query("s1d"))
        .with_status(200)
        .with_chunked_body(|w| {
            w.write_all(b"  [i] Downloading blocklists\n")?;
            std::thread::sleep(Duration::from_millis(400));
            w.write_all(b"  [i] Done.\n")
        })
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let started = Instant::now();
    session.update_gravity().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn update_gravity_body_past_long_timeout_is_gravity_error() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("POST", "/api/action/gravity")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_chunked_body(|w| {
            w.write_all(b"  [i] Downloading blocklists\n")?;
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(b"  [i] Done.\n")
        })
        .create_async()
        .await;

    let config = ApiConfig {
        long_timeout_secs: 1,
        ..common::api_config_for(&server)
    };
    let client = ApplianceClient::new(&config).unwrap();
    let session = client.login(HOST, "secret").await.unwrap();

    let started = Instant::now();
    let err = session.update_gravity().await.unwrap_err();
    assert!(matches!(err, PhError::GravityUpdate { .. }));
    assert!(err.source().is_some());
    assert!(started.elapsed() < Duration::from_secs(3));
}

// ---- status endpoints ----

#[tokio::test]
async fn status_endpoints_extract_named_fields() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "a+b=").await;
    let _mock = server
        .mock("GET", "/api/info/version")
        .match_query(sid_query("a+b="))
        .with_status(200)
        .with_body(r#"{"version":{"core":{"local":{"version":"v6.0.4"}}},"took":0.01}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/api/dns/blocking")
        .match_query(sid_query("a+b="))
        .with_status(200)
        .with_body(r#"{"blocking":"enabled","timer":null,"took":0.01}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("POST", "/api/dns/blocking")
        .match_query(sid_query("a+b="))
        .match_body(Matcher::Json(serde_json::json!({"blocking": false, "timer": 60})))
        .with_status(200)
        .with_body(r#"{"blocking":"disabled","timer":60,"took":0.01}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/api/config")
        .match_query(sid_query("a+b="))
        .with_status(200)
        .with_body(r#"{"config":{"dns":{"upstreams":["1.1.1.1"]}},"took":0.02}"#)
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();

    let version = session.get_version().await.unwrap();
    assert_eq!(version["core"]["local"]["version"], "v6.0.4");
    assert_eq!(session.get_blocking_status().await.unwrap(), BlockingStatus::Enabled);
    assert_eq!(
        session
            .set_blocking_status(BlockingRequest::disable(Some(60)))
            .await
            .unwrap(),
        BlockingStatus::Disabled
    );
    let config = session.get_config().await.unwrap();
    assert_eq!(config["config"]["dns"]["upstreams"][0], "1.1.1.1");
}

#[tokio::test]
async fn status_missing_field_is_api_error() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("GET", "/api/dns/blocking")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"took":0.01}"#)
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let err = session.get_blocking_status().await.unwrap_err();
    assert!(err.to_string().contains("missing field 'blocking'"));
}

// ---- logout ----

#[tokio::test]
async fn logout_returns_body_text() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let logout = server
        .mock("DELETE", "/api/auth")
        .match_query(sid_query("s1d"))
        .with_status(204)
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    assert_eq!(session.logout().await.unwrap(), "");
    logout.assert_async().await;
}

#[tokio::test]
async fn logout_failure_is_api_error() {
    let mut server = mock_appliance().await;
    let _login = mock_login(&mut server, "secret", "s1d").await;
    let _mock = server
        .mock("DELETE", "/api/auth")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let session = client_for(&server).login(HOST, "secret").await.unwrap();
    let err = session.logout().await.unwrap_err();
    assert!(matches!(err, PhError::Api { .. }));
    assert!(!err.to_string().contains("s1d"));
}
