//! Durable storage for the transaction collection.
//!
//! The collection is persisted whole, as a JSON array under a single key of
//! a [KeyValueStore] backend. Every mutation reads the full collection,
//! transforms it in memory, and writes it back as one key overwrite.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::transaction::Transaction;

/// The key the transaction collection is stored under by default.
pub const TRANSACTIONS_KEY: &str = "expenses_data";

/// The errors that may occur in the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The underlying key-value read failed.
    #[error("could not read from durable storage: {0}")]
    ReadFailure(String),

    /// The underlying key-value write failed.
    #[error("could not write to durable storage: {0}")]
    WriteFailure(String),
}

/// Durable string key-value storage, the seam the ledger persists through.
///
/// A missing key is a valid empty state everywhere, never an error.
/// Implementations provide no locking; see [TransactionStore] for the
/// single-writer contract.
pub trait KeyValueStore {
    /// The value stored under `key`, or `None` if the key has never been
    /// written.
    ///
    /// # Errors
    /// Returns [StoreError::ReadFailure] if the underlying read fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value under `key` in a single step.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the underlying write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key` and its value. Deleting a missing key is not an error.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the underlying delete fails.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stores the transaction collection in a [KeyValueStore] backend.
///
/// No partial updates and no locking: two callers racing their mutations on
/// the same key lose one of the updates (last write wins on the whole
/// collection). The host is single-user and serializes its own calls; this
/// store must not be assumed safe under concurrent writers.
#[derive(Debug, Clone)]
pub struct TransactionStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> TransactionStore<S> {
    /// Create a store over `backend` using [TRANSACTIONS_KEY].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, TRANSACTIONS_KEY)
    }

    /// Create a store over `backend` keeping the collection under `key`.
    pub fn with_key(backend: S, key: &str) -> Self {
        Self {
            backend,
            key: key.to_owned(),
        }
    }

    /// Add `transaction` to the front of the collection and persist it.
    ///
    /// Returns the updated collection, newest insertion first.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the write-back fails. The
    /// caller must not assume the record was stored.
    pub fn append(&mut self, transaction: Transaction) -> Result<Vec<Transaction>, StoreError> {
        let mut transactions = self.list_all();
        transactions.insert(0, transaction);

        self.write_collection(&transactions)?;

        Ok(transactions)
    }

    /// Every stored transaction, newest insertion first.
    ///
    /// A missing key yields the empty collection. A backend read failure or
    /// a collection that no longer parses also yields the empty collection
    /// instead of an error, so one bad blob cannot brick the ledger; the
    /// failure is logged at error level. Reading applies the kind default to
    /// records written before the `type` field existed.
    pub fn list_all(&self) -> Vec<Transaction> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::error!("could not read the transaction collection: {error}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("discarding transaction collection that no longer parses: {error}");
                Vec::new()
            }
        }
    }

    /// Drop the transaction with the given `id` and persist the rest.
    ///
    /// Returns the updated collection. An id that is not present leaves the
    /// contents unchanged; it is not an error.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the write-back fails.
    pub fn remove(&mut self, id: &str) -> Result<Vec<Transaction>, StoreError> {
        let mut transactions = self.list_all();
        transactions.retain(|transaction| transaction.id != id);

        self.write_collection(&transactions)?;

        Ok(transactions)
    }

    /// Delete the entire collection, underlying key included.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the underlying delete fails.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(&self.key)
    }

    fn write_collection(&mut self, transactions: &[Transaction]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(transactions)
            .map_err(|error| StoreError::WriteFailure(error.to_string()))?;

        self.backend.set(&self.key, &raw)
    }
}
