//! Shared test utilities for dispatcher integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use mockito::{Matcher, Mock, ServerGuard};
use ph_api::ApplianceClient;
use ph_core::config::{ApiConfig, RawAppliance};
use ph_core::validation::ValidatedConfig;
use ph_services::HostDispatcher;
use tempfile::TempDir;
use tracing::Dispatch;

pub const PASSWORD: &str = "correct horse";

/// Port the mock appliance listens on.
pub fn port_of(server: &ServerGuard) -> u16 {
    server
        .host_with_port()
        .rsplit_once(':')
        .and_then(|(_, p)| p.parse().ok())
        .expect("mock server port")
}

/// Dispatcher talking plain HTTP to `port` on every host.
pub fn dispatcher_for(port: u16) -> HostDispatcher {
    let config = ApiConfig {
        scheme: "http".into(),
        port: Some(port),
        verify_tls: false,
        timeout_secs: 5,
        long_timeout_secs: 5,
    };
    HostDispatcher::new(ApplianceClient::new(&config).expect("client"))
}

/// Validated configuration for `hosts` with a fresh backup directory.
/// The TempDir must be held alive for the duration of the test.
pub fn validated_config(hosts: &str) -> (ValidatedConfig, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let mut raw = RawAppliance::default();
    raw.apply_overrides(
        Some(PASSWORD.into()),
        Some(hosts.into()),
        Some(dir.path().to_string_lossy().into_owned()),
    );
    let config = ValidatedConfig::from_raw(&raw).expect("valid config");
    (config, dir)
}

/// Login accepted only for requests addressed to `host_header`.
pub async fn mock_login_for(server: &mut ServerGuard, host_header: &str, sid: &str) -> Mock {
    server
        .mock("POST", "/api/auth")
        .match_header("host", host_header)
        .match_body(Matcher::Json(serde_json::json!({ "password": PASSWORD })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "session": { "valid": true, "sid": sid } }).to_string())
        .create_async()
        .await
}

pub fn sid_query(sid: &str) -> Matcher {
    Matcher::UrlEncoded("sid".into(), sid.into())
}

/// In-memory log sink shared between a subscriber and the test body.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Plain-text fmt subscriber writing into this sink.
    pub fn dispatch(&self) -> Dispatch {
        let sink = self.clone();
        Dispatch::new(
            tracing_subscriber::fmt()
                .with_writer(move || sink.clone())
                .with_ansi(false)
                .finish(),
        )
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }

    /// Number of captured lines containing every one of `needles`.
    pub fn count(&self, needles: &[&str]) -> usize {
        self.lines()
            .iter()
            .filter(|line| needles.iter().all(|n| line.contains(n)))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
