//! Host tasks run by the dispatcher.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use ph_api::{BlockingRequest, BlockingStatus, Session};
use ph_core::error::PhResult;

use crate::dispatcher::HostTask;

/// Download the teleporter archive, then trigger a gravity update.
///
/// The gravity update is not attempted when the backup fails.
#[derive(Debug, Clone)]
pub struct BackupAndUpdate {
    backup_dir: PathBuf,
}

impl BackupAndUpdate {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }
}

#[async_trait]
impl HostTask for BackupAndUpdate {
    /// Path of the written archive.
    type Output = PathBuf;

    fn name(&self) -> &str {
        "backup and gravity update"
    }

    async fn run(&self, session: &Session) -> PhResult<PathBuf> {
        let path = session.get_backup(&self.backup_dir).await?;
        session.update_gravity().await?;
        Ok(path)
    }
}

/// Version and blocking state of one appliance.
#[derive(Debug, Clone, Serialize)]
pub struct ApplianceStatus {
    pub version: Value,
    pub blocking: BlockingStatus,
}

impl ApplianceStatus {
    /// Local core version string, when the appliance reports one.
    pub fn core_version(&self) -> Option<&str> {
        self.version
            .pointer("/core/local/version")
            .and_then(Value::as_str)
    }
}

/// Read version and blocking state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusProbe;

#[async_trait]
impl HostTask for StatusProbe {
    type Output = ApplianceStatus;

    fn name(&self) -> &str {
        "status probe"
    }

    async fn run(&self, session: &Session) -> PhResult<ApplianceStatus> {
        let version = session.get_version().await?;
        let blocking = session.get_blocking_status().await?;
        Ok(ApplianceStatus { version, blocking })
    }
}

/// Change the DNS blocking state.
#[derive(Debug, Clone, Copy)]
pub struct SetBlocking {
    request: BlockingRequest,
}

impl SetBlocking {
    pub fn new(request: BlockingRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl HostTask for SetBlocking {
    type Output = BlockingStatus;

    fn name(&self) -> &str {
        if self.request.blocking {
            "enable blocking"
        } else {
            "disable blocking"
        }
    }

    async fn run(&self, session: &Session) -> PhResult<BlockingStatus> {
        session.set_blocking_status(self.request).await
    }
}

/// Read the full appliance configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchConfig;

#[async_trait]
impl HostTask for FetchConfig {
    type Output = Value;

    fn name(&self) -> &str {
        "config export"
    }

    async fn run(&self, session: &Session) -> PhResult<Value> {
        session.get_config().await
    }
}
