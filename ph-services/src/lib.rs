//! pihole-keeper services - per-host workflows.
//!
//! The [`HostDispatcher`] walks the validated host list, runs a
//! [`HostTask`] inside an authenticated session for each host, always
//! attempts logout, and never lets one host's failure stop the others.

pub mod dispatcher;
pub mod tasks;

pub use dispatcher::{HostDispatcher, HostReport, HostTask, LogoutOutcome, RunSummary};
pub use tasks::{ApplianceStatus, BackupAndUpdate, FetchConfig, SetBlocking, StatusProbe};
