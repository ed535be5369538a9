//! Merchant grouping
//!
//! Transactions are grouped by exact, case-sensitive merchant key. "Netflix"
//! and "NETFLIX.COM" land in different groups even when they are the same
//! vendor. Any fuzzy matching belongs in a separate step before this one.

use std::collections::HashMap;

use crate::models::Transaction;

/// All transactions for one merchant key, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantGroup {
    pub merchant_key: String,
    pub transactions: Vec<Transaction>,
}

impl MerchantGroup {
    /// Groups with a single charge cannot form a pattern
    pub fn is_eligible(&self) -> bool {
        self.transactions.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Partition transactions by merchant key
///
/// Groups are returned in order of first appearance. Within a group the
/// sort by date is stable, so same-day charges keep their input order.
pub fn group_by_merchant(transactions: &[Transaction]) -> Vec<MerchantGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<MerchantGroup> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(tx.merchant_key.as_str()).or_insert_with(|| {
            groups.push(MerchantGroup {
                merchant_key: tx.merchant_key.clone(),
                transactions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].transactions.push(tx.clone());
    }

    for group in &mut groups {
        group.transactions.sort_by_key(|t| t.date);
    }

    groups
}
