//! Status command - version and blocking state of every host.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;

use ph_api::BlockingStatus;
use ph_core::config::AppConfig;
use ph_core::error::PhResult;
use ph_services::StatusProbe;

use crate::OutputFormat;

/// Run the status command.
pub async fn run(config: &AppConfig, format: OutputFormat) -> PhResult<()> {
    let (validated, dispatcher) = super::prepare(config)?;
    let summary = dispatcher.run(&validated, &StatusProbe).await;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = summary
                .reports
                .iter()
                .map(|r| {
                    super::report_json(r, |status| {
                        serde_json::to_value(status).unwrap_or_default()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports).unwrap_or_default());
        }
        OutputFormat::Text => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Host", "Version", "Blocking"]);

            for report in &summary.reports {
                match &report.outcome {
                    Ok(status) => {
                        let blocking = match status.blocking {
                            BlockingStatus::Enabled => style("enabled").green().to_string(),
                            BlockingStatus::Disabled => style("disabled").yellow().to_string(),
                            other => style(other.to_string()).red().to_string(),
                        };
                        table.add_row(vec![
                            report.host.clone(),
                            status.core_version().unwrap_or("unknown").to_string(),
                            blocking,
                        ]);
                    }
                    Err(_) => {
                        table.add_row(vec![
                            report.host.clone(),
                            "-".to_string(),
                            style("unreachable").red().to_string(),
                        ]);
                    }
                }
            }

            println!("{table}");
            for report in &summary.reports {
                super::print_failure_lines(report);
            }
        }
    }

    Ok(())
}
