use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CartStorage, StorageError, validate_key};

/// In-memory storage backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly: cloning shares the same underlying map, so a test can hand
/// one clone to a [`CartStore`](crate::cart::CartStore) and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::LockPoisoned` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("memory read"))?;
        Ok(entries.len())
    }

    /// Whether no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::LockPoisoned` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("memory read"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned("memory write"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned("memory write"))?;
        Ok(entries.remove(key).is_some())
    }
}
