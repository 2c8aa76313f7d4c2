//! Filtering and ordering over the transaction collection.
//!
//! A query is a conjunction of optional clauses; omitted clauses pass
//! everything. Filtering never mutates or reorders its input, and display
//! order is recomputed per query with [sort_newest_first] rather than
//! trusting stored order.

use time::OffsetDateTime;

use crate::{
    transaction::{Transaction, TransactionKind},
    window::{DateWindow, window_bounds},
};

/// The criteria for a filtered view of the collection.
///
/// Built fresh per query by the UI and never persisted. The default query
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Keep only records of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep only records whose local calendar day falls in this window.
    pub window: DateWindow,
    /// Keep only records with exactly this category (case-sensitive).
    pub category: Option<String>,
    /// Keep only records with exactly this counterparty (case-sensitive).
    pub counterparty: Option<String>,
    /// Keep only records with a case-insensitive substring match across
    /// category, place, counterparty, or the amount's decimal text. An empty
    /// string passes everything.
    pub search: Option<String>,
}

impl TransactionQuery {
    /// Whether `transaction` satisfies every clause of this query.
    ///
    /// # Arguments
    /// * `transaction` - the record to test.
    /// * `now` - the current instant, carrying the local offset; all
    ///   calendar comparisons happen in that offset.
    pub fn matches(&self, transaction: &Transaction, now: OffsetDateTime) -> bool {
        self.matches_kind(transaction)
            && self.matches_window(transaction, now)
            && self.matches_category(transaction)
            && self.matches_counterparty(transaction)
            && self.matches_search(transaction)
    }

    fn matches_kind(&self, transaction: &Transaction) -> bool {
        self.kind
            .map(|kind| kind == transaction.kind)
            .unwrap_or(true)
    }

    fn matches_window(&self, transaction: &Transaction, now: OffsetDateTime) -> bool {
        let local_date = transaction.occurred_at.to_offset(now.offset()).date();

        window_bounds(&self.window, now.date()).contains(local_date)
    }

    fn matches_category(&self, transaction: &Transaction) -> bool {
        self.category
            .as_ref()
            .map(|category| *category == transaction.category)
            .unwrap_or(true)
    }

    fn matches_counterparty(&self, transaction: &Transaction) -> bool {
        self.counterparty
            .as_ref()
            .map(|counterparty| *counterparty == transaction.counterparty)
            .unwrap_or(true)
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };

        if needle.is_empty() {
            return true;
        }

        let needle = needle.to_lowercase();

        transaction.category.to_lowercase().contains(&needle)
            || transaction
                .place
                .as_deref()
                .map(|place| place.to_lowercase().contains(&needle))
                .unwrap_or(false)
            || transaction.counterparty.to_lowercase().contains(&needle)
            || transaction.amount.to_string().contains(&needle)
    }
}

/// The records satisfying `query`, in their original order.
///
/// # Arguments
/// * `transactions` - the collection to filter; left untouched.
/// * `query` - the clauses to apply.
/// * `now` - the current instant at the local offset, used to anchor date
///   windows.
pub fn filter_transactions(
    transactions: &[Transaction],
    query: &TransactionQuery,
    now: OffsetDateTime,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| query.matches(transaction, now))
        .cloned()
        .collect()
}

/// Sort records by when they happened, newest first.
///
/// The sort is stable, so records sharing a timestamp keep their relative
/// order.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}
