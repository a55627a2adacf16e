//! The cart store.
//!
//! [`CartStore`] owns the shopper's line items and mirrors every change into
//! a [`CartStorage`] backend so the cart survives restarts.
//!
//! # Invariants
//!
//! - One [`LineItem`] per canonical [`ProductId`] (`42` and `"42"` are the same product)
//! - Quantities are always positive; driving one to zero removes the line
//! - Unit prices are finite and non-negative
//!
//! # Failure Handling
//!
//! Operations never fail. Unusable identifiers and non-positive quantities
//! are ignored, and a failed storage write is logged while the in-memory cart
//! stays authoritative.

mod line_item;
mod summary;

pub use line_item::LineItem;
pub use summary::CartSummary;

use mobistore_core::{CatalogProduct, CurrencyCode, ProductId, RawId};
use rust_decimal::Decimal;

use crate::persistence;
use crate::storage::CartStorage;

/// Storage key used when the caller does not pick one.
pub const DEFAULT_CART_KEY: &str = "mobistore:cart";

/// Client-side cart backed by durable storage.
///
/// All mutation goes through `&mut self`, so the collection can only change
/// through the operations below.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    key: String,
    items: Vec<LineItem>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart stored under `key`, migrating older records.
    ///
    /// A missing or unreadable record yields an empty cart.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = persistence::load(&storage, &key);
        Self {
            storage,
            key,
            items,
        }
    }

    /// Open the cart stored under [`DEFAULT_CART_KEY`].
    pub fn open_default(storage: S) -> Self {
        Self::open(storage, DEFAULT_CART_KEY)
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing line when the product is already in the cart;
    /// the existing line keeps its captured snapshot and unit price. Ignored
    /// if the product has no usable identifier or `quantity <= 0`.
    pub fn add_item(&mut self, product: &CatalogProduct, quantity: i64) {
        let Some(quantity) = positive(quantity) else {
            tracing::debug!(quantity, "Ignoring add with non-positive quantity");
            return;
        };
        let Some(id) = product.product_id() else {
            tracing::debug!("Ignoring add for product without identifier");
            return;
        };

        if let Some(existing) = self.items.iter_mut().find(|item| item.product.id == id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            tracing::debug!(product_id = %id, quantity = existing.quantity, "Incremented cart line");
        } else if let Some(item) = LineItem::new(product, quantity) {
            tracing::debug!(product_id = %id, quantity, unit_price = %item.unit_price, "Added cart line");
            self.items.push(item);
        }
        self.persist();
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &CatalogProduct) {
        self.add_item(product, 1);
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: impl Into<RawId>) {
        let Some(id) = ProductId::normalize(&product_id.into()) else {
            return;
        };
        let before = self.items.len();
        self.items.retain(|item| item.product.id != id);
        if self.items.len() != before {
            tracing::debug!(product_id = %id, "Removed cart line");
            self.persist();
        }
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. Products not in the cart are ignored.
    pub fn update_quantity(&mut self, product_id: impl Into<RawId>, quantity: i64) {
        let raw = product_id.into();
        let Some(quantity) = positive(quantity) else {
            self.remove_item(raw);
            return;
        };
        let Some(id) = ProductId::normalize(&raw) else {
            return;
        };
        let Some(existing) = self.items.iter_mut().find(|item| item.product.id == id) else {
            tracing::debug!(product_id = %id, "Ignoring quantity update for product not in cart");
            return;
        };
        if existing.quantity != quantity {
            existing.quantity = quantity;
            tracing::debug!(product_id = %id, quantity, "Updated cart line quantity");
            self.persist();
        }
    }

    /// Empty the cart, e.g. after an order was placed.
    pub fn clear(&mut self) {
        self.items.clear();
        tracing::debug!("Cleared cart");
        self.persist();
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: impl Into<RawId>) -> Option<&LineItem> {
        let id = ProductId::normalize(&product_id.into())?;
        self.items.iter().find(|item| item.product.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of line totals, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.line_total()).unwrap_or(Decimal::MAX)
        })
    }

    /// Badge count, line count and subtotal for display.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        CartSummary::new(self.total_quantity(), self.len(), self.subtotal(), currency)
    }

    /// Storage key the cart is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        if let Err(e) = persistence::save(&self.storage, &self.key, &self.items) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

fn positive(quantity: i64) -> Option<u64> {
    u64::try_from(quantity).ok().filter(|q| *q > 0)
}
