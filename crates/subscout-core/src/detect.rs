//! Subscription detection
//!
//! Pipeline: normalize → group by merchant → analyze each group → build
//! records. A merchant is a monthly subscription when:
//! 1. It was charged at least twice
//! 2. Every amount is within $1.00 of the group's mean amount
//! 3. Every gap between consecutive charges is 25 to 35 days (inclusive)
//!
//! The checks are strict: one irregular gap disqualifies the whole merchant.

use tracing::{debug, info, warn};

use crate::config::DetectionConfig;
use crate::error::{Error, Result};
use crate::group::{group_by_merchant, MerchantGroup};
use crate::models::{
    OneTimeCharge, RawRow, SkippedRow, SubscriptionRecord, TransactionAnnotation, Verdict,
    MONTHS_PER_YEAR,
};
use crate::normalize::normalize_rows;

/// Largest allowed distance between a charge and the group's mean amount
pub const MAX_AMOUNT_DEVIATION: f64 = 1.0;
/// Shortest gap (days) accepted as monthly
pub const MIN_INTERVAL_DAYS: i64 = 25;
/// Longest gap (days) accepted as monthly
pub const MAX_INTERVAL_DAYS: i64 = 35;
/// Minimum charges needed to call something recurring
pub const MIN_OCCURRENCES: usize = 2;

/// Slack for binary float error, so 10.00/12.00 sits exactly on the boundary
const AMOUNT_EPSILON: f64 = 1e-9;

/// Intermediate results of analyzing one merchant group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAnalysis {
    /// Whole-day gaps between consecutive charges (n - 1 entries)
    pub gaps: Vec<i64>,
    pub average_amount: f64,
    pub amount_consistent: bool,
    pub interval_regular: bool,
    pub verdict: Verdict,
}

impl GroupAnalysis {
    pub fn average_interval_days(&self) -> f64 {
        if self.gaps.is_empty() {
            return 0.0;
        }
        self.gaps.iter().sum::<i64>() as f64 / self.gaps.len() as f64
    }
}

/// Analyze a merchant group against the monthly subscription pattern
///
/// The group's transactions must already be sorted by date, as produced by
/// [`group_by_merchant`].
pub fn analyze_group(group: &MerchantGroup) -> GroupAnalysis {
    let txs = &group.transactions;

    let gaps: Vec<i64> = txs
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days())
        .collect();

    let average_amount = if txs.is_empty() {
        0.0
    } else {
        txs.iter().map(|t| t.amount).sum::<f64>() / txs.len() as f64
    };

    if txs.len() < MIN_OCCURRENCES {
        return GroupAnalysis {
            gaps,
            average_amount,
            amount_consistent: false,
            interval_regular: false,
            verdict: Verdict::OneTime,
        };
    }

    let amount_consistent = txs
        .iter()
        .all(|t| (t.amount - average_amount).abs() <= MAX_AMOUNT_DEVIATION + AMOUNT_EPSILON);

    let interval_regular = gaps
        .iter()
        .all(|gap| (MIN_INTERVAL_DAYS..=MAX_INTERVAL_DAYS).contains(gap));

    let verdict = match (amount_consistent, interval_regular) {
        (true, true) => Verdict::Subscription,
        (false, true) => Verdict::AmountInconsistent,
        (true, false) => Verdict::IrregularInterval,
        (false, false) => Verdict::Inconsistent,
    };

    GroupAnalysis {
        gaps,
        average_amount,
        amount_consistent,
        interval_regular,
        verdict,
    }
}

/// Build a subscription record from a matched group
///
/// Returns `None` if the analysis did not classify the group as a
/// subscription.
pub fn build_record(group: &MerchantGroup, analysis: &GroupAnalysis) -> Option<SubscriptionRecord> {
    if !analysis.verdict.is_subscription() {
        return None;
    }

    let first = group.transactions.first()?;
    // Last after the stable date sort, so a same-day tie goes to the later row
    let last = group.transactions.last()?;

    let monthly_cost = analysis.average_amount;

    Some(SubscriptionRecord {
        merchant_key: group.merchant_key.clone(),
        average_amount: analysis.average_amount,
        average_interval_days: analysis.average_interval_days(),
        occurrence_count: group.transactions.len(),
        first_date: first.date,
        last_date: last.date,
        category: last.category.clone(),
        monthly_cost,
        annual_cost: monthly_cost * MONTHS_PER_YEAR,
    })
}

/// Everything a caller needs from one detection run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionReport {
    /// Detected subscriptions, in order of the merchant's first appearance
    pub subscriptions: Vec<SubscriptionRecord>,
    /// Rows dropped by the normalizer, in input order
    pub skipped: Vec<SkippedRow>,
    /// One label per accepted row, in input order
    pub annotations: Vec<TransactionAnnotation>,
    /// Merchants charged exactly once
    pub one_time_charges: Vec<OneTimeCharge>,
    pub total_rows: usize,
    pub accepted_rows: usize,
}

impl DetectionReport {
    /// True when no row survived normalization
    pub fn is_empty_input(&self) -> bool {
        self.accepted_rows == 0
    }

    /// Turn an empty batch into [`Error::EmptyInput`]
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty_input() {
            return Err(Error::EmptyInput(format!(
                "no parseable transactions ({} rows, {} skipped)",
                self.total_rows,
                self.skipped.len()
            )));
        }
        Ok(())
    }

    /// Verdict for a given input row, if it was accepted
    pub fn verdict_for_row(&self, row: usize) -> Option<Verdict> {
        self.annotations
            .binary_search_by_key(&row, |a| a.row)
            .ok()
            .map(|i| self.annotations[i].verdict)
    }
}

/// Detect subscriptions with the default configuration
pub fn detect_subscriptions(rows: &[RawRow]) -> Result<DetectionReport> {
    detect_subscriptions_with_config(rows, &DetectionConfig::default())
}

/// Detect subscriptions in a batch of raw rows
///
/// Bad rows are reported in [`DetectionReport::skipped`]. The only hard
/// failure is a batch larger than `config.max_rows`.
pub fn detect_subscriptions_with_config(
    rows: &[RawRow],
    config: &DetectionConfig,
) -> Result<DetectionReport> {
    if rows.len() > config.max_rows {
        return Err(Error::Validation(format!(
            "{} rows exceeds the limit of {}",
            rows.len(),
            config.max_rows
        )));
    }

    let batch = normalize_rows(rows, &config.extra_date_formats);
    let accepted_rows = batch.transactions.len();

    if batch.transactions.is_empty() {
        warn!(
            "No parseable transactions in {} rows ({} skipped)",
            rows.len(),
            batch.skipped.len()
        );
    }

    let groups = group_by_merchant(&batch.transactions);

    let mut subscriptions = Vec::new();
    let mut one_time_charges = Vec::new();
    let mut annotations = Vec::with_capacity(accepted_rows);

    for group in &groups {
        let analysis = analyze_group(group);

        for tx in &group.transactions {
            annotations.push(TransactionAnnotation {
                row: tx.row,
                merchant_key: group.merchant_key.clone(),
                verdict: analysis.verdict,
            });
        }

        match analysis.verdict {
            Verdict::OneTime => {
                one_time_charges.extend(group.transactions.first().map(OneTimeCharge::from));
            }
            Verdict::Subscription => {
                if let Some(record) = build_record(group, &analysis) {
                    debug!(
                        "Found subscription: {} @ ${:.2} every ~{:.1} days ({} charges)",
                        record.merchant_key,
                        record.monthly_cost,
                        record.average_interval_days,
                        record.occurrence_count
                    );
                    subscriptions.push(record);
                }
            }
            verdict => {
                debug!(
                    "Rejected {}: {} (gaps {:?}, mean ${:.2})",
                    group.merchant_key, verdict, analysis.gaps, analysis.average_amount
                );
            }
        }
    }

    annotations.sort_by_key(|a| a.row);

    info!(
        "Detection complete: {} subscriptions, {} one-time charges, {} merchants, {} rows skipped",
        subscriptions.len(),
        one_time_charges.len(),
        groups.len(),
        batch.skipped.len()
    );

    Ok(DetectionReport {
        subscriptions,
        skipped: batch.skipped,
        annotations,
        one_time_charges,
        total_rows: rows.len(),
        accepted_rows,
    })
}
