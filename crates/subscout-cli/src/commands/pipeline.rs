//! Shared command plumbing: config loading and the CSV → report pipeline

use std::path::Path;

use anyhow::{Context, Result};
use subscout_core::{
    config::load_config, detect_subscriptions_with_config, import::read_csv_from_path,
    DetectionReport, SkippedRow,
};
use tracing::{debug, warn};

/// A detection run plus the CSV line each input row came from
#[derive(Debug)]
pub struct LoadedReport {
    pub report: DetectionReport,
    lines: Vec<u64>,
}

impl LoadedReport {
    /// Source line of a skipped row, falling back to its 1-based row number
    pub fn line_of(&self, skipped: &SkippedRow) -> u64 {
        self.lines
            .get(skipped.row)
            .copied()
            .unwrap_or(skipped.row as u64 + 1)
    }
}

/// Load config, read the CSV and run detection
pub fn load_report(config_path: Option<&Path>, file: &Path) -> Result<LoadedReport> {
    let config = load_config(config_path).context("Failed to load config")?;
    debug!("Using config: {:?}", config);

    let import = read_csv_from_path(file)
        .with_context(|| format!("Failed to read transactions from {}", file.display()))?;

    let report = detect_subscriptions_with_config(&import.rows, &config)
        .with_context(|| format!("Detection failed for {}", file.display()))?;

    let loaded = LoadedReport {
        report,
        lines: import.lines,
    };

    if let Some(first) = loaded.report.skipped.first() {
        warn!(
            "Skipped {} of {} rows (first at line {}: {}). Use --show-skipped for details.",
            loaded.report.skipped.len(),
            loaded.report.total_rows,
            loaded.line_of(first),
            first.reason.message()
        );
    }

    Ok(loaded)
}

/// Print the empty-state message shown when no row could be used
pub fn print_empty_state(report: &DetectionReport) {
    println!();
    println!(
        "⚠️  No usable transactions found ({} rows, {} skipped).",
        report.total_rows,
        report.skipped.len()
    );
    println!("   Expected columns: date, description, amount, category");
}
