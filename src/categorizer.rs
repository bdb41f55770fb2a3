//! Keyword-based categorization.
//!
//! A category matches when any of its keywords occurs anywhere in the
//! lower-cased transaction details. Categories are tried in store order and
//! the first match wins, so overlapping keywords resolve by which category
//! was declared first.

use crate::store::CategoryStore;
use crate::types::{Transaction, UNCATEGORIZED};

/// Name of the first category matching `details`, if any.
pub fn match_category<'a>(details: &str, store: &'a CategoryStore) -> Option<&'a str> {
    let details = details.to_lowercase();
    store
        .iter()
        .find(|category| category.matches(&details))
        .map(|category| category.name())
}

/// Returns a copy of `transactions` with every category recomputed from the
/// store. Earlier assignments are always overwritten.
pub fn categorize(transactions: &[Transaction], store: &CategoryStore) -> Vec<Transaction> {
    let categorized: Vec<Transaction> = transactions
        .iter()
        .map(|txn| Transaction {
            category: match_category(&txn.details, store)
                .unwrap_or(UNCATEGORIZED)
                .to_string(),
            ..txn.clone()
        })
        .collect();

    tracing::debug!(
        transactions = categorized.len(),
        uncategorized = categorized.iter().filter(|t| t.is_uncategorized()).count(),
        "categorized transactions"
    );

    categorized
}
