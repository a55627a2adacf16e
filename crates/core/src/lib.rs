//! Mobistore Core - Shared types library.
//!
//! This crate provides common types used across all Mobistore components:
//! - `storefront` - Cart store, persistence and checkout payloads
//! - `cli` - Command-line front end driving the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Normalized product identifiers, prices and catalog snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
