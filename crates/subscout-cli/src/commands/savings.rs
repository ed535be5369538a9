//! Savings command implementation

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use subscout_core::{compute_aggregates, export::format_money, AggregateSummary};
use tracing::warn;

use super::{load_report, print_empty_state};

pub fn cmd_savings(config_path: Option<&Path>, file: &Path, cancel: &[String]) -> Result<()> {
    let report = load_report(config_path, file)?.report;

    if report.is_empty_input() {
        print_empty_state(&report);
        return Ok(());
    }

    if report.subscriptions.is_empty() {
        println!("🎉 No recurring subscriptions detected, nothing to cancel.");
        return Ok(());
    }

    let excluded: HashSet<String> = cancel.iter().cloned().collect();
    for name in &excluded {
        if !report.subscriptions.iter().any(|s| &s.merchant_key == name) {
            warn!("Not a detected subscription (names are exact): {}", name);
        }
    }

    let summary = compute_aggregates(&report.subscriptions, &excluded);
    print!("{}", render_savings(&summary));

    Ok(())
}

/// Before/after/savings block plus the merchants marked for cancellation
pub fn render_savings(summary: &AggregateSummary) -> String {
    let mut out = String::new();

    out.push_str("\n💡 Potential Savings\n");
    out.push_str("   ─────────────────────────────\n");
    out.push_str(&format!(
        "   Before:  {}/mo  ({}/yr)\n",
        format_money(summary.baseline_monthly_cost),
        format_money(summary.baseline_annual_cost)
    ));
    out.push_str(&format!(
        "   After:   {}/mo  ({}/yr)\n",
        format_money(summary.total_monthly_cost),
        format_money(summary.total_annual_cost)
    ));
    out.push_str(&format!(
        "   Savings: {}/mo  ({}/yr)\n",
        format_money(summary.potential_savings_monthly),
        format_money(summary.potential_savings_annual)
    ));

    out.push('\n');
    if summary.marked_for_cancellation.is_empty() {
        out.push_str("   No subscriptions marked. Pass --cancel <MERCHANT> to try one.\n");
    } else {
        out.push_str("   Marked for cancellation:\n");
        for sub in &summary.marked_for_cancellation {
            out.push_str(&format!(
                "   - ❌ {} ({}/month)\n",
                sub.merchant_key,
                format_money(sub.monthly_cost)
            ));
        }
    }

    out
}
