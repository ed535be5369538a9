//! Cost aggregation and the what-if savings calculator
//!
//! The set of merchants marked for cancellation belongs to the caller and is
//! passed in on every call. Totals are recomputed from scratch each time.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{AggregateSummary, SubscriptionRecord, MONTHS_PER_YEAR};

/// Compute baseline, current and savings totals
///
/// - baseline: every record
/// - current: records whose key is not in `excluded`
/// - savings: records whose key is in `excluded`
pub fn compute_aggregates(
    subscriptions: &[SubscriptionRecord],
    excluded: &HashSet<String>,
) -> AggregateSummary {
    let mut baseline_monthly = 0.0;
    let mut savings_monthly = 0.0;
    let mut marked = Vec::new();

    for sub in subscriptions {
        baseline_monthly += sub.monthly_cost;
        if excluded.contains(&sub.merchant_key) {
            savings_monthly += sub.monthly_cost;
            marked.push(sub.clone());
        }
    }

    // Summed separately so an empty selection gives exactly the baseline
    let current_monthly: f64 = subscriptions
        .iter()
        .filter(|s| !excluded.contains(&s.merchant_key))
        .map(|s| s.monthly_cost)
        .sum();

    for key in excluded {
        if !subscriptions.iter().any(|s| &s.merchant_key == key) {
            debug!("Ignoring unknown merchant in cancellation set: {}", key);
        }
    }

    AggregateSummary {
        subscription_count: subscriptions.len(),
        baseline_monthly_cost: baseline_monthly,
        baseline_annual_cost: baseline_monthly * MONTHS_PER_YEAR,
        total_monthly_cost: current_monthly,
        total_annual_cost: current_monthly * MONTHS_PER_YEAR,
        potential_savings_monthly: savings_monthly,
        potential_savings_annual: savings_monthly * MONTHS_PER_YEAR,
        marked_for_cancellation: marked,
    }
}
