//! Detect command implementation

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use subscout_core::{compute_aggregates, export::format_money, export::to_json, DetectionReport};

use super::{load_report, print_empty_state, truncate, LoadedReport};
use crate::cli::OutputFormat;

pub fn cmd_detect(
    config_path: Option<&Path>,
    file: &Path,
    format: OutputFormat,
    one_time: bool,
    show_skipped: bool,
) -> Result<()> {
    let loaded = load_report(config_path, file)?;
    let report = &loaded.report;
    let summary = compute_aggregates(&report.subscriptions, &HashSet::new());

    if format == OutputFormat::Json {
        println!("{}", to_json(report, &summary)?);
        return Ok(());
    }

    if report.is_empty_input() {
        print_empty_state(report);
        return Ok(());
    }

    print_subscriptions(report);

    if !report.subscriptions.is_empty() {
        println!();
        println!("📊 Summary");
        println!("   ─────────────────────────────");
        println!("   Subscriptions detected: {}", summary.subscription_count);
        println!(
            "   Total monthly cost: {}",
            format_money(summary.total_monthly_cost)
        );
        println!(
            "   Total annual cost: {}",
            format_money(summary.total_annual_cost)
        );
    }

    if one_time {
        print_one_time_charges(report);
    }

    if show_skipped {
        print_skipped(&loaded);
    }

    Ok(())
}

fn print_subscriptions(report: &DetectionReport) {
    if report.subscriptions.is_empty() {
        println!();
        println!("🎉 No recurring subscriptions detected.");
        println!("   This could mean:");
        println!("   - You don't have any active subscriptions");
        println!("   - Charges haven't repeated often enough to form a pattern");
        println!("   - Try more transaction history (3+ months recommended)");
        return;
    }

    println!();
    println!("📋 Detected Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &report.subscriptions {
        println!(
            "   {:24} │ {:>9}/mo │ {:>10}/yr │ {}x │ last {} │ {}",
            truncate(&sub.merchant_key, 24),
            format_money(sub.monthly_cost),
            format_money(sub.annual_cost),
            sub.occurrence_count,
            sub.last_date,
            sub.frequency_label()
        );
    }
}

fn print_one_time_charges(report: &DetectionReport) {
    println!();
    println!("🧾 One-time Charges");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.one_time_charges.is_empty() {
        println!("   (none)");
        return;
    }

    for charge in &report.one_time_charges {
        println!(
            "   {} │ {:24} │ {:>9} │ {}",
            charge.date,
            truncate(&charge.merchant_key, 24),
            format_money(charge.amount),
            charge.category
        );
    }
}

fn print_skipped(loaded: &LoadedReport) {
    println!();
    print!("{}", render_skipped(loaded));
}

/// Skipped-row listing with source line numbers
pub fn render_skipped(loaded: &LoadedReport) -> String {
    let mut out = String::new();
    out.push_str("⏭️  Skipped Rows\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");

    if loaded.report.skipped.is_empty() {
        out.push_str("   (none)\n");
        return out;
    }

    for skipped in &loaded.report.skipped {
        out.push_str(&format!(
            "   line {:>5} │ {:10} │ {}\n",
            loaded.line_of(skipped),
            skipped.reason.as_str(),
            skipped.reason.message()
        ));
    }
    out
}
