//! Versioned cart record.
//!
//! # Record Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "items": [
//!     { "product": { "id": "42", "name": "Pixel 8" }, "quantity": 2, "unit_price": "699.00" }
//!   ],
//!   "saved_at": "2026-10-19T12:00:00Z"
//! }
//! ```
//!
//! Records without a `version` field predate versioning and are treated as
//! version 0. Older records are upgraded through [`migrations::MIGRATIONS`]
//! before their items are decoded.
//!
//! # Failure Handling
//!
//! [`decode`] reports what went wrong; [`load`] never fails and falls back to
//! an empty cart, since a broken record must not keep the shopper from
//! shopping.

pub mod migrations;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::cart::LineItem;
use crate::storage::{CartStorage, StorageError};

pub use migrations::{MIGRATIONS, Migration, MigrationError};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// Errors raised while decoding a stored record.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Not JSON at all.
    #[error("Record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON, but not shaped like a cart record.
    #[error("Malformed record: {0}")]
    Malformed(&'static str),

    /// Written by a newer build; its shape is unknown.
    #[error("Record version {found} is newer than supported version {current}")]
    UnsupportedVersion {
        /// Version found in the record.
        found: u64,
        /// Version this build writes.
        current: u32,
    },

    /// A migration step failed.
    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),
}

/// Errors raised while saving a record.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A successfully decoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCart {
    /// Items after migration and sanitizing.
    pub items: Vec<LineItem>,
    /// Version the record was stored at, before migration.
    pub source_version: u32,
    /// When the record was written, if it says.
    pub saved_at: Option<DateTime<Utc>>,
    /// Entries that could not be decoded and were dropped.
    pub discarded: usize,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u32,
    items: &'a [LineItem],
    saved_at: DateTime<Utc>,
}

/// Serialize `items` as a current-version record.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode(items: &[LineItem], saved_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RecordRef {
        version: CURRENT_VERSION,
        items,
        saved_at,
    })
}

/// Parse, migrate and sanitize a stored record.
///
/// Individual items that fail to decode are dropped and counted in
/// [`LoadedCart::discarded`]; only a record that is unusable as a whole is an
/// error.
///
/// # Errors
///
/// Returns `LoadError` if the record is not JSON, has the wrong shape, was
/// written by a newer build, or cannot be migrated.
pub fn decode(raw: &str) -> Result<LoadedCart, LoadError> {
    let record: Value = serde_json::from_str(raw)?;
    if !record.is_object() {
        return Err(LoadError::Malformed("record must be an object"));
    }

    let source_version = match record.get("version") {
        None | Some(Value::Null) => 0,
        Some(v) => {
            let found = v
                .as_u64()
                .ok_or(LoadError::Malformed("version must be a non-negative integer"))?;
            u32::try_from(found)
                .ok()
                .filter(|version| *version <= CURRENT_VERSION)
                .ok_or(LoadError::UnsupportedVersion {
                    found,
                    current: CURRENT_VERSION,
                })?
        }
    };

    let saved_at = record
        .get("saved_at")
        .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok());

    let record = migrations::migrate(record, source_version, CURRENT_VERSION, MIGRATIONS)?;

    let entries = record
        .get("items")
        .and_then(Value::as_array)
        .ok_or(LoadError::Malformed("items must be an array"))?;

    let mut decoded = Vec::with_capacity(entries.len());
    let mut discarded = 0;
    for entry in entries {
        match serde_json::from_value::<LineItem>(entry.clone()) {
            Ok(item) => decoded.push(item),
            Err(e) => {
                discarded += 1;
                tracing::warn!(error = %e, "Dropping undecodable cart item");
            }
        }
    }

    Ok(LoadedCart {
        items: sanitize(decoded),
        source_version,
        saved_at,
        discarded,
    })
}

/// Read the record under `key`, falling back to an empty cart on any failure.
pub fn load<S: CartStorage>(storage: &S, key: &str) -> Vec<LineItem> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No stored cart, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    match decode(&raw) {
        Ok(loaded) => {
            tracing::debug!(
                key,
                items = loaded.items.len(),
                source_version = loaded.source_version,
                discarded = loaded.discarded,
                "Loaded stored cart"
            );
            loaded.items
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable cart record");
            Vec::new()
        }
    }
}

/// Write `items` under `key` as a current-version record.
///
/// # Errors
///
/// Returns `PersistError` if serialization or the storage write fails.
pub fn save<S: CartStorage>(storage: &S, key: &str, items: &[LineItem]) -> Result<(), PersistError> {
    let raw = encode(items, Utc::now())?;
    storage.write(key, &raw)?;
    Ok(())
}

/// Re-establish the line item invariants on decoded data.
///
/// Zero quantities are dropped, negative prices become zero, and repeated
/// product ids merge into the first occurrence (keeping its unit price).
fn sanitize(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
    for mut item in items {
        if item.quantity == 0 {
            continue;
        }
        if item.unit_price.is_sign_negative() {
            item.unit_price = rust_decimal::Decimal::ZERO;
        }
        match merged.iter_mut().find(|m| m.product.id == item.product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => merged.push(item),
        }
    }
    merged
}
