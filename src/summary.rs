//! Summary statistics over transaction sequences.
//!
//! Everything here recomputes from the sequence it is handed; there is no
//! incremental state.

use time::OffsetDateTime;

use crate::{
    transaction::{Transaction, TransactionKind},
    window::{DateWindow, window_bounds},
};

/// Headline statistics for a sequence of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    /// The sum of all amounts. Zero for an empty sequence.
    pub total: f64,
    /// The largest single amount. Zero for an empty sequence.
    pub highest: f64,
    /// The most frequent category, `None` for an empty sequence.
    ///
    /// Count ties keep the category that appeared first in the sequence;
    /// they are not broken by recency or alphabetical order.
    pub modal_category: Option<String>,
}

/// Compute [SummaryStats] over `transactions`.
///
/// An empty sequence is a normal state, not an error: both figures are zero
/// and the modal category is `None`.
pub fn summarize(transactions: &[Transaction]) -> SummaryStats {
    let mut total = 0.0;
    let mut highest = 0.0_f64;
    // The tally keeps first-seen order so count ties resolve to the
    // category encountered first.
    let mut category_counts: Vec<(&str, u32)> = Vec::new();

    for transaction in transactions {
        total += transaction.amount;
        highest = highest.max(transaction.amount);

        match category_counts
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, count)) => *count += 1,
            None => category_counts.push((&transaction.category, 1)),
        }
    }

    let mut modal: Option<(&str, u32)> = None;

    for &(category, count) in &category_counts {
        let beats_current = match modal {
            Some((_, best_count)) => count > best_count,
            None => true,
        };

        if beats_current {
            modal = Some((category, count));
        }
    }

    SummaryStats {
        total,
        highest,
        modal_category: modal.map(|(category, _)| category.to_owned()),
    }
}

/// Income and spending for the current local calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthOverview {
    /// Income recorded this month.
    pub income: f64,
    /// Expenses recorded this month.
    pub expenses: f64,
    /// What is left of the month's income after its expenses.
    pub savings: f64,
}

impl MonthOverview {
    /// Savings as a percentage of income.
    ///
    /// `None` when no income was recorded this month, since there is
    /// nothing to take a percentage of.
    pub fn savings_rate(&self) -> Option<f64> {
        (self.income > 0.0).then(|| self.savings / self.income * 100.0)
    }
}

/// Compute the [MonthOverview] for the local calendar month containing
/// `now`.
///
/// Records are assigned to the month by their local calendar day, the same
/// way date windows match them.
pub fn month_overview(transactions: &[Transaction], now: OffsetDateTime) -> MonthOverview {
    let bounds = window_bounds(&DateWindow::ThisMonth, now.date());
    let mut overview = MonthOverview::default();

    for transaction in transactions {
        let local_date = transaction.occurred_at.to_offset(now.offset()).date();

        if !bounds.contains(local_date) {
            continue;
        }

        match transaction.kind {
            TransactionKind::Income => overview.income += transaction.amount,
            TransactionKind::Expense => overview.expenses += transaction.amount,
        }
    }

    overview.savings = overview.income - overview.expenses;

    overview
}
