//! Integration tests for Mobistore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mobistore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart operations through the public API
//! - `cart_persistence` - File-backed storage, reloads and schema migration
//! - `checkout` - Order payloads and clearing after submission
//!
//! This crate also provides small fixtures shared by the test files.

use std::path::{Path, PathBuf};

use mobistore_core::CatalogProduct;
use mobistore_storefront::{CartStore, FileStorage};

/// A unique data directory under the system temp dir, removed on drop.
pub struct TempDataDir {
    path: PathBuf,
}

impl TempDataDir {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("mobistore-it-{}", uuid::Uuid::new_v4())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File storage rooted at this directory.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.path)
    }

    /// Open the default cart in this directory.
    #[must_use]
    pub fn open_cart(&self) -> CartStore<FileStorage> {
        CartStore::open_default(self.storage())
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A catalog phone with a numeric id and string price.
#[must_use]
pub fn phone(id: i64, price: &str) -> CatalogProduct {
    CatalogProduct::new(id)
        .with_name(format!("Phone {id}"))
        .with_brand("Acme")
        .with_price(price)
        .with_image(format!("/images/phone-{id}.png"))
}
