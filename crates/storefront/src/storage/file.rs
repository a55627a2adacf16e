use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{CartStorage, StorageError, validate_key};

/// Filesystem storage: each key is a `.json` file inside `root`.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write leaves the previous record intact. The directory is
/// created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. Does not touch the filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// `:` is not portable in file names, so it maps to `~` (which keys
    /// cannot contain, keeping the mapping one-to-one).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` if the key fails validation.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key.replace(':', "~"))))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote cart record");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("mobistore-file-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_path_for_maps_colons() {
        let storage = FileStorage::new("/data");
        let path = storage.path_for("mobistore:cart").unwrap();
        assert_eq!(path, PathBuf::from("/data/mobistore~cart.json"));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let storage = FileStorage::new("/data");
        assert!(storage.path_for("../secrets").is_err());
    }

    #[test]
    fn test_read_missing_directory() {
        let storage = FileStorage::new(temp_root());
        assert_eq!(storage.read("mobistore:cart").unwrap(), None);
    }

    #[test]
    fn test_write_read_remove() {
        let root = temp_root();
        let storage = FileStorage::new(&root);

        storage.write("mobistore:cart", r#"{"version":1}"#).unwrap();
        assert_eq!(
            storage.read("mobistore:cart").unwrap().as_deref(),
            Some(r#"{"version":1}"#)
        );

        storage.write("mobistore:cart", r#"{"version":2}"#).unwrap();
        assert_eq!(
            storage.read("mobistore:cart").unwrap().as_deref(),
            Some(r#"{"version":2}"#)
        );
        assert!(!root.join("mobistore~cart.json.tmp").exists());

        assert!(storage.remove("mobistore:cart").unwrap());
        assert!(!storage.remove("mobistore:cart").unwrap());

        fs::remove_dir_all(&root).unwrap();
    }
}
