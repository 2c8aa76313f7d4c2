//! Defines the transaction record model, its validation rules, and the
//! category vocabularies offered to the UI.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. salary or dividends.
    Income,
    /// Money spent.
    ///
    /// Records written before the kind field existed have no `type` entry on
    /// disk; they deserialize as expenses. The default is applied on every
    /// read and the stored bytes stay untouched until the collection is next
    /// rewritten.
    #[default]
    Expense,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Immutable once created: a record is written once, may be removed by id,
/// and is never edited in place. To create one from user input, use
/// [TransactionDraft::normalize].
///
/// The serialized form uses the durable field names (`type`, `purpose`,
/// `withWhom`, `date`) so existing collections keep reading back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id, the creation timestamp as Unix epoch milliseconds.
    ///
    /// Uniqueness is the caller's responsibility: two records created in the
    /// same millisecond would collide, and the store does not check.
    pub id: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    /// The amount of money spent or earned. Always finite and non-negative.
    pub amount: f64,
    /// What the money was for, e.g. "Food", "Job".
    ///
    /// Drawn from [EXPENSE_CATEGORIES]/[INCOME_CATEGORIES] by the UI but
    /// stored as free text with no referential enforcement.
    #[serde(rename = "purpose")]
    pub category: String,
    /// Who the transaction was with. Always [INCOME_COUNTERPARTY] for income.
    #[serde(rename = "withWhom")]
    pub counterparty: String,
    /// Optional shop or note text.
    #[serde(default)]
    pub place: Option<String>,
    /// When the transaction happened. Drives all date filtering and ordering.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

/// User input for a new transaction, as it comes off the entry form.
///
/// The amount is kept as the raw text the user typed so validation can
/// report exactly what was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The raw amount text.
    pub amount: String,
    /// What the money was for.
    pub category: String,
    /// Who the transaction was with. Ignored for income.
    pub counterparty: String,
    /// Optional shop or note text.
    pub place: Option<String>,
}

impl TransactionDraft {
    /// Validate the draft and turn it into a [Transaction] created at `now`.
    ///
    /// The id is assigned deterministically from `now` (epoch milliseconds)
    /// and `occurred_at` is set to `now`. Income records always get
    /// [INCOME_COUNTERPARTY] as their counterparty, and a `place` that is
    /// empty after trimming becomes `None`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [ValidationError::MissingAmount] if the amount text is empty,
    /// - or [ValidationError::InvalidAmount] if the amount text does not
    ///   parse to a finite, non-negative number.
    pub fn normalize(self, now: OffsetDateTime) -> Result<Transaction, ValidationError> {
        let raw_amount = self.amount.trim();

        if raw_amount.is_empty() {
            return Err(ValidationError::MissingAmount);
        }

        let amount: f64 = raw_amount
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(raw_amount.to_owned()))?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::InvalidAmount(raw_amount.to_owned()));
        }

        let counterparty = match self.kind {
            TransactionKind::Income => INCOME_COUNTERPARTY.to_owned(),
            TransactionKind::Expense => self.counterparty,
        };

        let place = self
            .place
            .map(|place| place.trim().to_owned())
            .filter(|place| !place.is_empty());

        Ok(Transaction {
            id: transaction_id(now),
            kind: self.kind,
            amount,
            category: self.category,
            counterparty,
            place,
            occurred_at: now,
        })
    }
}

/// The id for a transaction created at `now`: Unix epoch milliseconds as a
/// decimal string.
pub fn transaction_id(now: OffsetDateTime) -> String {
    (now.unix_timestamp_nanos() / 1_000_000).to_string()
}

/// The errors that may occur while validating a transaction draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No amount was entered.
    #[error("an amount is required")]
    MissingAmount,

    /// The amount text did not parse to a finite, non-negative number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),
}

// ============================================================================
// VOCABULARIES
// ============================================================================

/// The counterparty recorded for every income transaction.
pub const INCOME_COUNTERPARTY: &str = "Self";

/// The counterparty choices offered for expenses.
pub const COUNTERPARTIES: &[&str] = &["Self", "Family", "Relatives", "Friends", "Unknown"];

/// The category choices offered for expenses.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Travelling",
    "Tea/Coffee",
    "Movie",
    "Entertainment",
    "Shopping",
    "Others",
];

/// The category choices offered for income.
pub const INCOME_CATEGORIES: &[&str] = &["Job", "Bonus", "Shares", "Stock", "Others"];

/// The category choices offered for transactions of the given kind.
///
/// These are suggestions for the entry form, not constraints: stored records
/// keep whatever text they were created with.
pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod wire_format_tests {
    use time::macros::datetime;

    use crate::transaction::{Transaction, TransactionKind};

    #[test]
    fn serializes_with_durable_field_names() {
        let transaction = Transaction {
            id: "1704450600000".to_owned(),
            kind: TransactionKind::Expense,
            amount: 120.5,
            category: "Food".to_owned(),
            counterparty: "Friends".to_owned(),
            place: None,
            occurred_at: datetime!(2024-01-05 10:30 UTC),
        };

        let json = serde_json::to_value(&transaction).expect("Could not serialize transaction");

        assert_eq!(json["id"], "1704450600000");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 120.5);
        assert_eq!(json["purpose"], "Food");
        assert_eq!(json["withWhom"], "Friends");
        assert_eq!(json["place"], serde_json::Value::Null);
        assert_eq!(json["date"], "2024-01-05T10:30:00Z");
    }

    #[test]
    fn deserializes_legacy_record_without_kind_as_expense() {
        let json = r#"{
            "id": "1704450600000",
            "amount": 45.0,
            "purpose": "Movie",
            "withWhom": "Family",
            "place": "PVR",
            "date": "2024-01-05T10:30:00.000Z"
        }"#;

        let transaction: Transaction =
            serde_json::from_str(json).expect("Could not deserialize legacy record");

        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, "Movie");
        assert_eq!(transaction.counterparty, "Family");
        assert_eq!(transaction.place, Some("PVR".to_owned()));
    }

    #[test]
    fn round_trips_income_record() {
        let transaction = Transaction {
            id: "1704450600001".to_owned(),
            kind: TransactionKind::Income,
            amount: 5000.0,
            category: "Job".to_owned(),
            counterparty: "Self".to_owned(),
            place: None,
            occurred_at: datetime!(2024-01-31 09:00 +5:30),
        };

        let json = serde_json::to_string(&transaction).expect("Could not serialize transaction");
        let got: Transaction = serde_json::from_str(&json).expect("Could not deserialize record");

        assert_eq!(got, transaction);
    }
}
