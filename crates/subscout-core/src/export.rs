//! Report export
//!
//! Supports:
//! - Subscription report CSV (one row per detected subscription)
//! - JSON export of a detection run with its cost summary

use std::io::Write;

use serde::Serialize;

use crate::detect::DetectionReport;
use crate::error::Result;
use crate::models::{AggregateSummary, OneTimeCharge, SkippedRow, SubscriptionRecord};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// One line of the subscription report CSV
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Service")]
    service: &'a str,
    #[serde(rename = "Monthly Cost")]
    monthly_cost: String,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Times Charged")]
    times_charged: usize,
    #[serde(rename = "Last Charge")]
    last_charge: String,
    #[serde(rename = "Annual Cost")]
    annual_cost: String,
}

impl<'a> From<&'a SubscriptionRecord> for ReportRow<'a> {
    fn from(sub: &'a SubscriptionRecord) -> Self {
        Self {
            service: &sub.merchant_key,
            monthly_cost: format_money(sub.monthly_cost),
            frequency: sub.frequency_label(),
            category: &sub.category,
            times_charged: sub.occurrence_count,
            last_charge: sub.last_date.format("%Y-%m-%d").to_string(),
            annual_cost: format_money(sub.annual_cost),
        }
    }
}

/// Format an amount as "$12.34" (or "-$12.34")
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Write the subscription report as CSV
///
/// The header row is written even when there are no subscriptions.
pub fn write_report_csv<W: Write>(subscriptions: &[SubscriptionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record([
        "Service",
        "Monthly Cost",
        "Frequency",
        "Category",
        "Times Charged",
        "Last Charge",
        "Annual Cost",
    ])?;

    for sub in subscriptions {
        wtr.serialize(ReportRow::from(sub))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the subscription report CSV into a string
pub fn report_csv_string(subscriptions: &[SubscriptionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_report_csv(subscriptions, &mut buf)?;
    String::from_utf8(buf).map_err(|e| crate::error::Error::InvalidData(e.to_string()))
}

/// JSON shape of a detection run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub subscriptions: &'a [SubscriptionRecord],
    pub summary: &'a AggregateSummary,
    pub one_time_charges: &'a [OneTimeCharge],
    pub skipped: &'a [SkippedRow],
    pub total_rows: usize,
    pub accepted_rows: usize,
}

/// Serialize a detection run and its summary as pretty JSON
pub fn to_json(report: &DetectionReport, summary: &AggregateSummary) -> Result<String> {
    let json = JsonReport {
        subscriptions: &report.subscriptions,
        summary,
        one_time_charges: &report.one_time_charges,
        skipped: &report.skipped,
        total_rows: report.total_rows,
        accepted_rows: report.accepted_rows,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
