//! Durable key/value storage for the cart record.
//!
//! The cart writes one JSON document under one namespaced key, the same
//! contract browser local storage offers. Backends:
//!
//! - [`MemoryStorage`] - Shared in-process map (tests, ephemeral sessions)
//! - [`FileStorage`] - One file per key inside a data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key is empty or contains characters outside `[A-Za-z0-9._:-]`.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the storage lock.
    #[error("Storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// A string key/value store.
///
/// Methods take `&self`; backends handle their own interior mutability so a
/// store can be shared between the cart and whatever inspects it.
pub trait CartStorage {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Returns `true` if a value existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

/// Check that `key` is usable by every backend.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for empty keys, keys starting with a
/// dot, or keys with characters outside `[A-Za-z0-9._:-]`.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if key.is_empty() || key.starts_with('.') || !valid_chars {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_namespaced_keys() {
        assert!(validate_key("mobistore:cart").is_ok());
        assert!(validate_key("cart-v2.backup_1").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_bad_keys() {
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(validate_key("..").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("cart key").is_err());
        assert!(validate_key("cart/key").is_err());
    }
}
