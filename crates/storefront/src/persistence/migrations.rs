//! Schema migrations for the persisted cart record.
//!
//! A migration is a pure function over the raw JSON record, registered with
//! the version it upgrades from and the version it produces. Loading applies
//! steps one after another until the record reaches
//! [`CURRENT_VERSION`](super::CURRENT_VERSION). A new schema change is one
//! more entry in [`MIGRATIONS`].

use mobistore_core::{ProductId, RawId};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while migrating a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// No registered step upgrades from this version.
    #[error("no migration registered from version {0}")]
    MissingStep(u32),

    /// A step does not move the version forward.
    #[error("migration from version {from} targets non-increasing version {to}")]
    NonIncreasing {
        /// Source version of the offending step.
        from: u32,
        /// Target version of the offending step.
        to: u32,
    },

    /// The record does not have the shape a step expects.
    #[error("malformed record: {0}")]
    Malformed(&'static str),
}

/// One versioned transformation of the raw record.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from_version: u32,
    pub to_version: u32,
    pub transform: fn(Value) -> Result<Value, MigrationError>,
}

/// Every migration, keyed by source version.
pub const MIGRATIONS: &[Migration] = &[Migration {
    from_version: 0,
    to_version: 1,
    transform: stringify_product_ids,
}];

/// Upgrade `record` from version `from` to version `to`.
///
/// # Errors
///
/// Returns `MigrationError` if a step is missing, misconfigured, or rejects
/// the record.
pub fn migrate(
    mut record: Value,
    from: u32,
    to: u32,
    migrations: &[Migration],
) -> Result<Value, MigrationError> {
    let mut version = from;
    while version < to {
        let step = migrations
            .iter()
            .find(|m| m.from_version == version)
            .ok_or(MigrationError::MissingStep(version))?;
        if step.to_version <= step.from_version {
            return Err(MigrationError::NonIncreasing {
                from: step.from_version,
                to: step.to_version,
            });
        }
        record = (step.transform)(record)?;
        tracing::info!(
            from = step.from_version,
            to = step.to_version,
            "Migrated cart record"
        );
        version = step.to_version;
    }
    Ok(record)
}

/// v0 -> v1: product identifiers become canonical strings.
///
/// Items without a product object are left alone; the loader drops them.
fn stringify_product_ids(mut record: Value) -> Result<Value, MigrationError> {
    let items = record
        .get_mut("items")
        .and_then(Value::as_array_mut)
        .ok_or(MigrationError::Malformed("items must be an array"))?;

    for item in items {
        let Some(id) = item.get_mut("product").and_then(|p| p.get_mut("id")) else {
            continue;
        };
        let canonical = serde_json::from_value::<RawId>(id.clone())
            .ok()
            .as_ref()
            .and_then(ProductId::normalize);
        if let Some(canonical) = canonical {
            *id = Value::String(canonical.into_inner());
        }
    }
    Ok(record)
}
