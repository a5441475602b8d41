//! Teleporter (configuration export) endpoint.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use reqwest::{Method, Response};
use tracing::{debug, info};

use ph_core::constants::{self, endpoints};
use ph_core::error::{PhError, PhResult};

use crate::session::Session;

/// A downloaded teleporter archive, not yet written to disk.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    host: String,
    captured_at: DateTime<Local>,
    data: Vec<u8>,
}

impl BackupArtifact {
    pub fn new(host: impl Into<String>, captured_at: DateTime<Local>, data: Vec<u8>) -> Self {
        Self {
            host: host.into(),
            captured_at,
            data,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File name of the archive: `{host}_{YYYYMMDD_HHMMSS}_backup.zip`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_backup.zip",
            self.host,
            self.captured_at.format(constants::BACKUP_TIMESTAMP_FORMAT)
        )
    }

    /// Write the archive into `dir`, creating the directory if needed.
    /// Returns the path of the written file.
    pub async fn persist(self, dir: &Path) -> PhResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            PhError::backup_with(format!("cannot create directory: {}", dir.display()), e)
        })?;

        let path = dir.join(self.file_name());
        tokio::fs::write(&path, &self.data).await.map_err(|e| {
            PhError::backup_with(format!("failed to save backup to {}", dir.display()), e)
        })?;

        Ok(path)
    }
}

impl Session {
    /// Download the teleporter archive into memory.
    pub async fn download_backup(&self) -> PhResult<BackupArtifact> {
        let url = self.endpoint(endpoints::TELEPORTER);
        let captured_at = Local::now();
        debug!("GET {}{}", self.api_url(), endpoints::TELEPORTER);

        let response = self
            .client()
            .build_request(Method::GET, &url, self.client().long_timeout(), None)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| PhError::backup_with("failed to download backup", e.without_url()))?;

        let data = response
            .bytes()
            .await
            .map_err(|e| PhError::backup_with("failed to download backup", e.without_url()))?;

        Ok(BackupArtifact::new(self.host(), captured_at, data.to_vec()))
    }

    /// Download the teleporter archive and write it into `target_dir`.
    ///
    /// Nothing touches the filesystem unless the download succeeded.
    pub async fn get_backup(&self, target_dir: &Path) -> PhResult<PathBuf> {
        let artifact = self.download_backup().await?;
        let size = artifact.data().len();
        let path = artifact.persist(target_dir).await?;
        info!("saved {size} byte backup to {}", path.display());
        Ok(path)
    }
}
