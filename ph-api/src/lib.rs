//! pihole-keeper API - HTTP client for the Pi-hole v6 admin REST API.
//!
//! [`ApplianceClient`] holds the transport settings and performs login.
//! A successful login yields a [`Session`], the only handle through which
//! authenticated endpoints (teleporter export, gravity update, status and
//! configuration reads) can be reached. Nothing is retried.

pub mod client;
pub mod endpoints;
pub mod response;
pub mod session;

// Re-export key types
pub use client::ApplianceClient;
pub use endpoints::teleporter::BackupArtifact;
pub use response::{BlockingRequest, BlockingStatus};
pub use session::Session;
