//! Spreadsheet export of the expense ledger.
//!
//! The export re-reads the store, keeps only expense records, encodes them
//! into a single-sheet xlsx workbook, and hands the bytes to a [ShareSink].
//! Income records are never exported.

use std::{fs, io, path::PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};
use time::format_description::well_known::Rfc3339;

use crate::{
    store::{KeyValueStore, TransactionStore},
    transaction::{Transaction, TransactionKind},
};

/// File name the exported workbook is shared under.
pub const EXPORT_FILE_NAME: &str = "expenses.xlsx";

/// Name of the single worksheet in the exported workbook.
const SHEET_NAME: &str = "Expenses";

/// Header row of the worksheet, matching the stored field names.
const COLUMNS: [&str; 7] = [
    "id",
    "type",
    "amount",
    "purpose",
    "withWhom",
    "place",
    "date",
];

/// The errors that may occur while exporting the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The records could not be encoded into a workbook.
    #[error("the expense records could not be encoded: {0}")]
    EncodingFailure(String),
    /// The sink accepted the handoff and then failed.
    #[error("the exported workbook could not be shared: {0}")]
    ShareFailure(String),
}

impl From<XlsxError> for ExportError {
    fn from(error: XlsxError) -> Self {
        ExportError::EncodingFailure(error.to_string())
    }
}

/// A destination that exported files can be handed to, such as the
/// platform share dialog or a downloads directory.
pub trait ShareSink {
    /// Whether the sink can currently accept a file.
    fn is_available(&self) -> bool;

    /// Hand the named file contents to the sink.
    fn share(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// A [ShareSink] that writes exported files into a directory.
pub struct SaveToDirectory {
    directory: PathBuf,
}

impl SaveToDirectory {
    /// Create a sink that saves exports under `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ShareSink for SaveToDirectory {
    fn is_available(&self) -> bool {
        self.directory.is_dir()
    }

    fn share(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.directory.join(file_name), bytes)
    }
}

/// Export the store's expense records as an xlsx workbook and hand it to
/// `sink` under the name [EXPORT_FILE_NAME].
///
/// Returns `Ok(false)` when there was nothing to hand over, either because
/// the ledger holds no expenses or because the sink is unavailable. Both
/// are normal states, not errors.
///
/// # Errors
///
/// Returns [ExportError::EncodingFailure] when the workbook cannot be
/// built, or [ExportError::ShareFailure] when the sink rejects the handoff.
pub fn export_expenses<S, K>(store: &TransactionStore<S>, sink: &mut K) -> Result<bool, ExportError>
where
    S: KeyValueStore,
    K: ShareSink,
{
    let expenses = exportable_expenses(store.list_all());

    if expenses.is_empty() {
        tracing::debug!("skipping export: the ledger holds no expense records");
        return Ok(false);
    }

    let workbook = encode_workbook(&expenses)?;

    if !sink.is_available() {
        tracing::warn!("skipping export: no share target is available");
        return Ok(false);
    }

    sink.share(EXPORT_FILE_NAME, &workbook)
        .map_err(|error| ExportError::ShareFailure(error.to_string()))?;

    Ok(true)
}

/// Keep only the records that belong in the export.
fn exportable_expenses(collection: Vec<Transaction>) -> Vec<Transaction> {
    collection
        .into_iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
        .collect()
}

/// One worksheet row, in [COLUMNS] order.
#[derive(Debug, Clone, PartialEq)]
struct SheetRow {
    id: String,
    kind: &'static str,
    amount: f64,
    category: String,
    counterparty: String,
    place: String,
    date: String,
}

/// Flatten `expenses` into worksheet rows.
fn sheet_rows(expenses: &[Transaction]) -> Result<Vec<SheetRow>, ExportError> {
    expenses
        .iter()
        .map(|transaction| {
            let date = transaction
                .occurred_at
                .format(&Rfc3339)
                .map_err(|error| ExportError::EncodingFailure(error.to_string()))?;

            Ok(SheetRow {
                id: transaction.id.clone(),
                kind: match transaction.kind {
                    TransactionKind::Expense => "expense",
                    TransactionKind::Income => "income",
                },
                amount: transaction.amount,
                category: transaction.category.clone(),
                counterparty: transaction.counterparty.clone(),
                place: transaction.place.clone().unwrap_or_default(),
                date,
            })
        })
        .collect()
}

/// Encode `expenses` into the bytes of a single-sheet xlsx workbook.
fn encode_workbook(expenses: &[Transaction]) -> Result<Vec<u8>, ExportError> {
    let rows = sheet_rows(expenses)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (column, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, column as u16, *name)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_number = index as u32 + 1;

        worksheet.write_string(row_number, 0, row.id.as_str())?;
        worksheet.write_string(row_number, 1, row.kind)?;
        worksheet.write_number(row_number, 2, row.amount)?;
        worksheet.write_string(row_number, 3, row.category.as_str())?;
        worksheet.write_string(row_number, 4, row.counterparty.as_str())?;
        worksheet.write_string(row_number, 5, row.place.as_str())?;
        worksheet.write_string(row_number, 6, row.date.as_str())?;
    }

    let bytes = workbook.save_to_buffer()?;

    Ok(bytes)
}

#[cfg(test)]
mod export_tests {
    use std::io;

    use time::macros::datetime;

    use crate::{
        export::{
            EXPORT_FILE_NAME, ExportError, SaveToDirectory, ShareSink, encode_workbook,
            export_expenses, exportable_expenses, sheet_rows,
        },
        store::{MemoryStore, TransactionStore},
        transaction::{Transaction, TransactionKind},
    };

    struct RecordingSink {
        available: bool,
        broken: bool,
        shared: Vec<(String, Vec<u8>)>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                available: true,
                broken: false,
                shared: Vec::new(),
            }
        }
    }

    impl ShareSink for RecordingSink {
        fn is_available(&self) -> bool {
            self.available
        }

        fn share(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
            if self.broken {
                return Err(io::Error::other("share dialog dismissed"));
            }

            self.shared.push((file_name.to_owned(), bytes.to_vec()));

            Ok(())
        }
    }

    fn create_test_transaction(kind: TransactionKind, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: "1704450600000".to_owned(),
            kind,
            amount,
            category: category.to_owned(),
            counterparty: "Self".to_owned(),
            place: Some("Cafe Beans".to_owned()),
            occurred_at: datetime!(2024-01-05 10:30 UTC),
        }
    }

    fn get_test_store() -> TransactionStore<MemoryStore> {
        let mut store = TransactionStore::new(MemoryStore::new());

        store
            .append(create_test_transaction(
                TransactionKind::Expense,
                100.0,
                "Food",
            ))
            .expect("could not seed the test store");
        store
            .append(create_test_transaction(
                TransactionKind::Expense,
                250.0,
                "Shopping",
            ))
            .expect("could not seed the test store");
        store
            .append(create_test_transaction(
                TransactionKind::Expense,
                40.0,
                "Movie",
            ))
            .expect("could not seed the test store");
        store
            .append(create_test_transaction(
                TransactionKind::Income,
                5000.0,
                "Job",
            ))
            .expect("could not seed the test store");

        store
    }

    #[test]
    fn export_keeps_expenses_and_drops_income() {
        let store = get_test_store();

        let expenses = exportable_expenses(store.list_all());
        let rows = sheet_rows(&expenses).expect("could not build the worksheet rows");

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.kind == "expense"));
    }

    #[test]
    fn sheet_rows_map_every_field() {
        let expenses = vec![create_test_transaction(
            TransactionKind::Expense,
            100.0,
            "Food",
        )];

        let rows = sheet_rows(&expenses).expect("could not build the worksheet rows");

        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.id, "1704450600000");
        assert_eq!(row.kind, "expense");
        assert_eq!(row.amount, 100.0);
        assert_eq!(row.category, "Food");
        assert_eq!(row.counterparty, "Self");
        assert_eq!(row.place, "Cafe Beans");
        assert_eq!(row.date, "2024-01-05T10:30:00Z");
    }

    #[test]
    fn sheet_rows_leave_a_missing_place_blank() {
        let mut transaction = create_test_transaction(TransactionKind::Expense, 100.0, "Food");
        transaction.place = None;

        let rows = sheet_rows(&[transaction]).expect("could not build the worksheet rows");

        assert_eq!(rows[0].place, "");
    }

    #[test]
    fn encoded_workbook_is_a_zip_archive() {
        let expenses = vec![create_test_transaction(
            TransactionKind::Expense,
            100.0,
            "Food",
        )];

        let bytes = encode_workbook(&expenses).expect("could not encode the workbook");

        // xlsx is a zip container, so the bytes must carry the zip magic.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn export_hands_the_workbook_to_the_sink() {
        let store = get_test_store();
        let mut sink = RecordingSink::new();

        let got = export_expenses(&store, &mut sink);

        assert_eq!(got, Ok(true));
        assert_eq!(sink.shared.len(), 1);

        let (file_name, bytes) = &sink.shared[0];
        assert_eq!(file_name, EXPORT_FILE_NAME);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn export_returns_false_for_an_empty_ledger() {
        let store = TransactionStore::new(MemoryStore::new());
        let mut sink = RecordingSink::new();

        let got = export_expenses(&store, &mut sink);

        assert_eq!(got, Ok(false));
        assert!(sink.shared.is_empty());
    }

    #[test]
    fn export_returns_false_when_only_income_is_recorded() {
        let mut store = TransactionStore::new(MemoryStore::new());
        store
            .append(create_test_transaction(
                TransactionKind::Income,
                5000.0,
                "Job",
            ))
            .expect("could not seed the test store");

        let mut sink = RecordingSink::new();

        let got = export_expenses(&store, &mut sink);

        assert_eq!(got, Ok(false));
        assert!(sink.shared.is_empty());
    }

    #[test]
    fn export_returns_false_when_the_sink_is_unavailable() {
        let store = get_test_store();
        let mut sink = RecordingSink::new();
        sink.available = false;

        let got = export_expenses(&store, &mut sink);

        assert_eq!(got, Ok(false));
        assert!(sink.shared.is_empty());
    }

    #[test]
    fn a_rejected_handoff_propagates_as_a_share_failure() {
        let store = get_test_store();
        let mut sink = RecordingSink::new();
        sink.broken = true;

        let got = export_expenses(&store, &mut sink);

        assert_eq!(
            got,
            Err(ExportError::ShareFailure(
                "share dialog dismissed".to_owned()
            ))
        );
    }

    #[test]
    fn save_to_directory_writes_the_file() {
        let directory = tempfile::tempdir().expect("could not create a temporary directory");
        let store = get_test_store();
        let mut sink = SaveToDirectory::new(directory.path());

        let got = export_expenses(&store, &mut sink);

        assert_eq!(got, Ok(true));

        let file_path = directory.path().join(EXPORT_FILE_NAME);
        assert!(file_path.is_file());
    }

    #[test]
    fn save_to_directory_is_unavailable_without_the_directory() {
        let sink = SaveToDirectory::new("/definitely/not/a/real/directory");

        assert!(!sink.is_available());
    }
}
