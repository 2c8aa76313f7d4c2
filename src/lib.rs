//! Kharcha is a personal income and expense ledger.
//!
//! The library keeps every transaction in one durable collection and offers
//! filtering, summary statistics, and spreadsheet export over it. Hosts
//! bring their own storage and share target by implementing [KeyValueStore]
//! and [ShareSink]; [FileStore] and [SaveToDirectory] cover the common
//! desktop case.

#![warn(missing_docs)]

mod clock;
mod export;
mod query;
mod store;
mod summary;
mod transaction;
mod window;

pub use clock::local_now;
pub use export::{EXPORT_FILE_NAME, ExportError, SaveToDirectory, ShareSink, export_expenses};
pub use query::{TransactionQuery, filter_transactions, sort_newest_first};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, StoreError, TRANSACTIONS_KEY, TransactionStore,
};
pub use summary::{MonthOverview, SummaryStats, month_overview, summarize};
pub use transaction::{
    COUNTERPARTIES, EXPENSE_CATEGORIES, INCOME_CATEGORIES, INCOME_COUNTERPARTY, Transaction,
    TransactionDraft, TransactionKind, ValidationError, categories_for, transaction_id,
};
pub use window::{CustomWindow, DateRange, DateWindow};
