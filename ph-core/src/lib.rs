//! pihole-keeper core - foundation types shared by every other crate.
//!
//! This crate provides:
//! - The error taxonomy (configuration, validation, API, backup, gravity)
//! - Configuration file loading and raw appliance inputs
//! - Validation of raw inputs into a `ValidatedConfig`
//! - Structured logging setup with tracing
//! - Common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod validation;

// Re-export commonly used items at the crate root
pub use config::{ApiConfig, AppConfig, LoggingConfig, RawAppliance};
pub use error::{ErrorKind, PhError, PhResult};
pub use logging::Logger;
pub use validation::ValidatedConfig;
