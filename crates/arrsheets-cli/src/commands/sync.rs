use super::config::load_validated_config;
use super::sync_ui::SyncUI;
use crate::output::{Output, OutputFormat};
use arr_sync_core::{SyncOrchestrator, SyncReport, WriteBack};
use arr_sync_models::SyncStatus;
use arr_sync_sources::SourceSet;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use serde_json::json;
use std::path::Path;

pub async fn run_sync(config_path: &Path, dry_run: bool, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let config = load_validated_config(config_path)?;
    let range = config
        .sheet_range()
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;

    let ui = SyncUI::new(!output.is_quiet() && !output.format().is_json());
    ui.set_message("Connecting to Google Sheets...");

    let sources = SourceSet::from_config(&config)
        .await
        .wrap_err("Failed to set up clients")?;

    ui.set_message(format!("Reading {}...", range));
    let orchestrator = SyncOrchestrator::new(sources, range)
        .with_dry_run(dry_run)
        .with_progress(ui.row_callback());

    let report = orchestrator.run().await;
    ui.finish();

    match output.format() {
        OutputFormat::Human => print_report(&report, output),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let report_json = serde_json::to_value(&report).wrap_err("Failed to serialize sync report")?;
            output.json(&json!({
                "success": !report.has_errors(),
                "counts": report.status_counts(),
                "report": report_json,
            }));
        }
    }

    Ok(())
}

fn print_report(report: &SyncReport, output: &Output) {
    if let Some(error) = &report.read_error {
        output.error(format!("Could not read the watch list: {}", error));
    }

    if !output.is_quiet() && report.rows.iter().any(|row| !row.output.is_blank()) {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("Row").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Id").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Date").add_attribute(comfy_table::Attribute::Bold),
        ]);
        for row in report.rows.iter().filter(|row| !row.output.is_blank()) {
            let id = row.external_id.map(|id| id.to_string()).unwrap_or_default();
            table.add_row(vec![
                Cell::new(row.row_number),
                Cell::new(id),
                status_cell(row.output.status),
                Cell::new(&row.output.date),
            ]);
        }
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        println!("{}", table);
        println!();
    }

    let counts = report
        .status_counts()
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect::<Vec<_>>()
        .join(", ");
    if !counts.is_empty() {
        output.info(format!("Statuses: {}", counts));
    }

    match &report.write_back {
        WriteBack::Written { range, rows } => output.success(format!("Wrote {} rows to {}", rows, range)),
        WriteBack::Skipped { reason } => output.info(format!("Sheet not updated ({})", reason)),
        WriteBack::Failed { range, error, hint } => {
            output.error(format!("Could not write results to {}: {}", range, error));
            if let Some(hint) = hint {
                output.warn(hint);
            }
        }
    }

    let verb = if report.dry_run { "would be added" } else { "added" };
    output.success(format!(
        "Sync completed: {} rows, {} titles {} in {:.1}s",
        report.rows.len(),
        report.added + report.count(SyncStatus::WouldAdd.category()),
        verb,
        report.duration.as_secs_f64()
    ));
}

fn status_cell(status: Option<SyncStatus>) -> Cell {
    let label = status.map(|s| s.label()).unwrap_or_default();
    let color = match status {
        Some(SyncStatus::Downloaded) => Color::Green,
        Some(SyncStatus::Monitored) | Some(SyncStatus::WouldAdd) => Color::Cyan,
        Some(SyncStatus::Partial(_)) => Color::Yellow,
        Some(SyncStatus::NotFound) => Color::DarkGrey,
        Some(SyncStatus::FailedToAdd) | Some(SyncStatus::Error) => Color::Red,
        None => Color::Reset,
    };
    Cell::new(label).fg(color)
}
