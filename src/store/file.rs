//! Implements a file-backed key-value store.

use std::{fs, io::ErrorKind, path::PathBuf};

use crate::store::{KeyValueStore, StoreError};

/// Key-value storage with one file per key under a root directory.
///
/// Keys are used as file names verbatim, which is fine for the fixed keys
/// this crate uses. Writes go straight to the key's file; there is no
/// locking and no crash atomicity beyond a single write call.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if it does
    /// not exist yet.
    ///
    /// # Errors
    /// Returns [StoreError::WriteFailure] if the directory cannot be
    /// created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|error| StoreError::WriteFailure(error.to_string()))?;

        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::ReadFailure(error.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value)
            .map_err(|error| StoreError::WriteFailure(error.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::WriteFailure(error.to_string())),
        }
    }
}
