//! Config command - dump the configuration of every host.

use console::style;
use serde_json::{Map, Value};

use ph_core::config::AppConfig;
use ph_core::error::PhResult;
use ph_services::FetchConfig;

use crate::OutputFormat;

pub async fn run(config: &AppConfig, format: OutputFormat) -> PhResult<()> {
    let (validated, dispatcher) = super::prepare(config)?;
    let summary = dispatcher.run(&validated, &FetchConfig).await;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = summary
                .reports
                .iter()
                .map(|r| super::report_json(r, Value::clone))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports).unwrap_or_default());
        }
        OutputFormat::Text => {
            // Keyed by host so the output stays valid JSON
            let mut by_host = Map::new();
            for report in &summary.reports {
                if let Ok(value) = &report.outcome {
                    by_host.insert(report.host.clone(), value.clone());
                }
            }
            println!("{}", serde_json::to_string_pretty(&by_host).unwrap_or_default());
            for report in &summary.reports {
                if report.outcome.is_err() {
                    eprintln!("{} {}", style("FAIL").red().bold(), report.host);
                }
            }
        }
    }

    Ok(())
}
