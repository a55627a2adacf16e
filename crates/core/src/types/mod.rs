//! Core types for Mobistore.
//!
//! This module provides type-safe wrappers for the loosely typed values the
//! product catalog API hands out.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError, RawId};
pub use price::{CurrencyCode, CurrencyCodeError, Price, RawPrice};
pub use product::{CatalogProduct, ProductSnapshot};
