//! Domain models for SubScout

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Months per year used to project monthly costs
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// An input row as handed over by the I/O layer
///
/// Nothing here is validated yet; the normalizer turns it into a
/// [`Transaction`] or a [`SkippedRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub description: String,
    pub amount: RawAmount,
    #[serde(default)]
    pub category: String,
}

impl RawRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<RawAmount>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }
}

/// Amount as received: either already numeric or still text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for RawAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A normalized transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Index of the source row in the input batch
    pub row: usize,
    pub date: NaiveDate,
    /// Trimmed description, used verbatim as the grouping identity
    pub merchant_key: String,
    /// Positive = charge
    pub amount: f64,
    pub category: String,
}

/// A detected monthly subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub merchant_key: String,
    pub average_amount: f64,
    pub average_interval_days: f64,
    pub occurrence_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Category of the most recent charge
    pub category: String,
    pub monthly_cost: f64,
    pub annual_cost: f64,
}

impl SubscriptionRecord {
    /// Human-readable cadence, e.g. "Every ~30 days"
    pub fn frequency_label(&self) -> String {
        format!("Every ~{} days", self.average_interval_days.trunc() as i64)
    }
}

/// Why a row was left out of the working set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// Date or amount could not be parsed
    Parse(String),
    /// Row parsed but is unusable (e.g. blank merchant)
    Validation(String),
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validation",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Parse(m) | Self::Validation(m) => m,
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.message())
    }
}

/// A row that did not make it past the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub raw: RawRow,
    pub reason: SkipReason,
}

/// Outcome of detection for a merchant group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Matches the monthly subscription pattern
    Subscription,
    /// Only one transaction for this merchant
    OneTime,
    /// Amounts drift more than the allowed deviation
    AmountInconsistent,
    /// At least one gap falls outside the monthly window
    IrregularInterval,
    /// Both the amount and the interval checks failed
    Inconsistent,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::OneTime => "one_time",
            Self::AmountInconsistent => "amount_inconsistent",
            Self::IrregularInterval => "irregular_interval",
            Self::Inconsistent => "inconsistent",
        }
    }

    pub fn is_subscription(&self) -> bool {
        matches!(self, Self::Subscription)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-transaction label produced by a detection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAnnotation {
    pub row: usize,
    pub merchant_key: String,
    pub verdict: Verdict,
}

/// A merchant seen exactly once in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeCharge {
    pub merchant_key: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
}

impl From<&Transaction> for OneTimeCharge {
    fn from(tx: &Transaction) -> Self {
        Self {
            merchant_key: tx.merchant_key.clone(),
            date: tx.date,
            amount: tx.amount,
            category: tx.category.clone(),
        }
    }
}

/// Portfolio totals for the savings calculator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub subscription_count: usize,
    /// Sum over every subscription, before any cancellation
    pub baseline_monthly_cost: f64,
    pub baseline_annual_cost: f64,
    /// Sum over subscriptions not marked for cancellation
    pub total_monthly_cost: f64,
    pub total_annual_cost: f64,
    /// Sum over subscriptions marked for cancellation
    pub potential_savings_monthly: f64,
    pub potential_savings_annual: f64,
    /// Records marked for cancellation, in record order
    pub marked_for_cancellation: Vec<SubscriptionRecord>,
}
