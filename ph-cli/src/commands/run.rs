//! Run command - teleporter backup and gravity update on every host.

use console::style;
use serde_json::json;

use ph_core::config::AppConfig;
use ph_core::error::PhResult;
use ph_services::BackupAndUpdate;

use crate::OutputFormat;

/// Run the backup workflow. Host failures are reported, not returned.
pub async fn run(config: &AppConfig, format: OutputFormat) -> PhResult<()> {
    let (validated, dispatcher) = super::prepare(config)?;
    let task = BackupAndUpdate::new(validated.backup_dir());
    let summary = dispatcher.run(&validated, &task).await;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = summary
                .reports
                .iter()
                .map(|r| super::report_json(r, |path| json!(path.display().to_string())))
                .collect();
            let out = json!({
                "succeeded": summary.succeeded(),
                "failed": summary.failed(),
                "hosts": reports,
            });
            println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("{}", style("Backup and gravity update").bold().underlined());
            for report in &summary.reports {
                if let Ok(path) = &report.outcome {
                    println!(
                        "  {} {}  {}",
                        style("OK").green().bold(),
                        report.host,
                        path.display()
                    );
                }
                super::print_failure_lines(report);
            }
            println!();
            println!(
                "  {} succeeded, {} failed",
                summary.succeeded(),
                summary.failed()
            );
        }
    }

    Ok(())
}
