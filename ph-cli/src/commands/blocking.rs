//! Blocking command - toggle DNS blocking on every host.

use clap::Subcommand;
use console::style;
use serde_json::json;

use ph_api::BlockingRequest;
use ph_core::config::AppConfig;
use ph_core::error::PhResult;
use ph_services::SetBlocking;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum BlockingAction {
    /// Enable DNS blocking.
    Enable,
    /// Disable DNS blocking.
    Disable {
        /// Re-enable automatically after this many seconds.
        #[arg(short, long)]
        timer: Option<u64>,
    },
}

impl BlockingAction {
    fn request(&self) -> BlockingRequest {
        match self {
            Self::Enable => BlockingRequest::enable(),
            Self::Disable { timer } => BlockingRequest::disable(*timer),
        }
    }
}

pub async fn run(config: &AppConfig, action: BlockingAction, format: OutputFormat) -> PhResult<()> {
    let (validated, dispatcher) = super::prepare(config)?;
    let summary = dispatcher
        .run(&validated, &SetBlocking::new(action.request()))
        .await;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = summary
                .reports
                .iter()
                .map(|r| super::report_json(r, |state| json!(state)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports).unwrap_or_default());
        }
        OutputFormat::Text => {
            for report in &summary.reports {
                if let Ok(state) = &report.outcome {
                    println!(
                        "  {} {}  blocking {}",
                        style("OK").green().bold(),
                        report.host,
                        state
                    );
                }
                super::print_failure_lines(report);
            }
        }
    }

    Ok(())
}
