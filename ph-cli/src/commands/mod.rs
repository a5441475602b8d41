//! CLI command implementations.

pub mod blocking;
pub mod config;
pub mod run;
pub mod status;

use console::style;
use serde_json::{json, Value};
use tracing::error;

use ph_api::ApplianceClient;
use ph_core::config::AppConfig;
use ph_core::error::{display_chain, PhResult};
use ph_core::validation::ValidatedConfig;
use ph_services::{HostDispatcher, HostReport, LogoutOutcome};

/// Validate the configuration and build a dispatcher.
///
/// Runs before any network activity; a failure here ends the process.
pub fn prepare(config: &AppConfig) -> PhResult<(ValidatedConfig, HostDispatcher)> {
    let prepared = ValidatedConfig::from_raw(&config.appliance).and_then(|validated| {
        let client = ApplianceClient::new(&config.api)?;
        Ok((validated, HostDispatcher::new(client)))
    });
    if let Err(err) = &prepared {
        error!("configuration rejected: {}", display_chain(err));
    }
    prepared
}

/// JSON object describing one host report.
pub fn report_json<T>(report: &HostReport<T>, value: impl FnOnce(&T) -> Value) -> Value {
    let mut out = json!({
        "host": report.host,
        "success": report.is_success(),
        "logout": report.logout.as_str(),
    });
    match &report.outcome {
        Ok(v) => out["result"] = value(v),
        Err(err) => {
            out["error"] = json!({
                "kind": err.kind().as_str(),
                "message": display_chain(err),
            });
        }
    }
    if let LogoutOutcome::Failed(err) = &report.logout {
        out["logout_error"] = json!(display_chain(err));
    }
    out
}

/// Print a failed host line, plus a logout warning if cleanup failed.
pub fn print_failure_lines<T>(report: &HostReport<T>) {
    if let Err(err) = &report.outcome {
        println!(
            "  {} {}  {}",
            style("FAIL").red().bold(),
            report.host,
            display_chain(err)
        );
    }
    if let LogoutOutcome::Failed(err) = &report.logout {
        println!(
            "  {} {}  logout failed: {}",
            style("WARN").yellow().bold(),
            report.host,
            display_chain(err)
        );
    }
}
