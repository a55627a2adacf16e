//! Mobistore Storefront library.
//!
//! Client-side cart state for the storefront: the [`cart::CartStore`], the
//! durable record it keeps in sync, and the checkout payload built from it.
//!
//! # Modules
//!
//! - [`cart`] - Line items and the store that owns them
//! - [`storage`] - Key/value backends the cart record is written to
//! - [`persistence`] - Versioned record format and schema migrations
//! - [`checkout`] - Order submission payloads
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod persistence;
pub mod storage;

pub use cart::{CartStore, CartSummary, DEFAULT_CART_KEY, LineItem};
pub use checkout::{CheckoutError, CheckoutLine, CheckoutPayload, place_order};
pub use config::{ConfigError, LogFormat, StorefrontConfig};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
