//! SubScout Core Library
//!
//! Recurring subscription detection for a flat list of transactions:
//! - Normalizer for loosely-typed input rows
//! - Exact-key merchant grouping
//! - Monthly pattern analysis (amount consistency + interval regularity)
//! - Subscription records and what-if savings aggregation
//! - CSV import and subscription report export

pub mod aggregate;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod group;
pub mod import;
pub mod models;
pub mod normalize;

pub use aggregate::compute_aggregates;
pub use config::{load_config, DetectionConfig};
pub use detect::{
    analyze_group, build_record, detect_subscriptions, detect_subscriptions_with_config,
    DetectionReport, GroupAnalysis,
};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use group::{group_by_merchant, MerchantGroup};
pub use import::CsvImport;
pub use models::{
    AggregateSummary, OneTimeCharge, RawAmount, RawRow, SkipReason, SkippedRow,
    SubscriptionRecord, Transaction, TransactionAnnotation, Verdict,
};
