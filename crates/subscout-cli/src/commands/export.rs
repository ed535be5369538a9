//! Export command implementation

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use subscout_core::{
    compute_aggregates,
    export::{to_json, write_report_csv},
    ExportFormat,
};

use super::load_report;

pub fn cmd_export(
    config_path: Option<&Path>,
    file: &Path,
    output: &Path,
    format: ExportFormat,
) -> Result<()> {
    let report = load_report(config_path, file)?.report;

    match format {
        ExportFormat::Csv => {
            let out = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_report_csv(&report.subscriptions, out).context("Failed to write report")?;
        }
        ExportFormat::Json => {
            let summary = compute_aggregates(&report.subscriptions, &HashSet::new());
            let json = to_json(&report, &summary)?;
            fs::write(output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
    }

    println!(
        "✅ Exported {} subscriptions to {}",
        report.subscriptions.len(),
        output.display()
    );

    Ok(())
}
