//! Order submission payloads.
//!
//! The cart never talks to the order API itself. Callers build a
//! [`CheckoutPayload`] from the store, send it however they like, and the
//! cart is cleared only once that submission reports success.
//!
//! # Usage
//!
//! ```rust,ignore
//! let receipt = place_order(&mut cart, CurrencyCode::USD, |payload| {
//!     orders_api.submit(payload)
//! })?;
//! ```

use mobistore_core::{CurrencyCode, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{CartStore, LineItem};
use crate::storage::CartStorage;

/// Errors from [`place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError<E> {
    /// Nothing to order; `submit` was not called.
    #[error("Cart is empty")]
    EmptyCart,

    /// The caller's submission failed; the cart is left untouched.
    #[error("Order submission failed: {0}")]
    Submission(E),
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&LineItem> for CheckoutLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            name: item.product.display_name().to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
        }
    }
}

/// Body sent to the order submission API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutPayload {
    /// Idempotency key for the submission.
    pub request_id: Uuid,
    pub items: Vec<CheckoutLine>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub currency: CurrencyCode,
}

impl CheckoutPayload {
    /// Build a payload from the cart's current contents.
    ///
    /// Returns `None` for an empty cart.
    #[must_use]
    pub fn from_store<S: CartStorage>(store: &CartStore<S>, currency: CurrencyCode) -> Option<Self> {
        if store.is_empty() {
            return None;
        }
        Some(Self {
            request_id: Uuid::new_v4(),
            items: store.items().iter().map(CheckoutLine::from).collect(),
            item_count: store.total_quantity(),
            subtotal: store.subtotal(),
            currency,
        })
    }
}

/// Submit the cart through `submit` and clear it on success.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` without calling `submit` if the cart is
/// empty, or `CheckoutError::Submission` (leaving the cart intact) if
/// `submit` fails.
pub fn place_order<S, T, E, F>(
    store: &mut CartStore<S>,
    currency: CurrencyCode,
    submit: F,
) -> Result<T, CheckoutError<E>>
where
    S: CartStorage,
    F: FnOnce(&CheckoutPayload) -> Result<T, E>,
{
    let payload = CheckoutPayload::from_store(store, currency).ok_or(CheckoutError::EmptyCart)?;
    let receipt = submit(&payload).map_err(CheckoutError::Submission)?;
    tracing::info!(
        request_id = %payload.request_id,
        item_count = payload.item_count,
        subtotal = %payload.subtotal,
        "Order placed, clearing cart"
    );
    store.clear();
    Ok(receipt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use mobistore_core::CatalogProduct;

    use super::*;
    use crate::storage::MemoryStorage;

    fn filled_cart() -> CartStore<MemoryStorage> {
        let mut cart = CartStore::open_default(MemoryStorage::new());
        cart.add_item(
            &CatalogProduct::new(1).with_name("Pixel 8").with_price("699.00"),
            1,
        );
        cart.add_item(&CatalogProduct::new("case-9").with_price("19.50"), 2);
        cart
    }

    #[test]
    fn test_payload_from_store() {
        let cart = filled_cart();
        let payload = CheckoutPayload::from_store(&cart, CurrencyCode::USD).unwrap();
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].name, "Pixel 8");
        assert_eq!(payload.items[1].name, "case-9");
        assert_eq!(payload.items[1].line_total, Decimal::new(3900, 2));
        assert_eq!(payload.item_count, 3);
        assert_eq!(payload.subtotal, Decimal::new(73800, 2));
    }

    #[test]
    fn test_payload_serializes_ids_as_strings() {
        let cart = filled_cart();
        let payload = CheckoutPayload::from_store(&cart, CurrencyCode::USD).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["items"][0]["product_id"], serde_json::json!("1"));
        assert_eq!(json["currency"], serde_json::json!("USD"));
    }

    #[test]
    fn test_payload_empty_cart() {
        let cart = CartStore::open_default(MemoryStorage::new());
        assert!(CheckoutPayload::from_store(&cart, CurrencyCode::USD).is_none());
    }

    #[test]
    fn test_place_order_clears_on_success() {
        let mut cart = filled_cart();
        let receipt: Result<&str, CheckoutError<String>> =
            place_order(&mut cart, CurrencyCode::USD, |_| Ok("order-1"));
        assert_eq!(receipt.unwrap(), "order-1");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_place_order_keeps_cart_on_failure() {
        let mut cart = filled_cart();
        let result: Result<(), _> = place_order(&mut cart, CurrencyCode::USD, |_| {
            Err("payment declined".to_string())
        });
        assert!(matches!(result, Err(CheckoutError::Submission(ref e)) if e == "payment declined"));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_place_order_empty_cart_skips_submit() {
        let mut cart = CartStore::open_default(MemoryStorage::new());
        let mut called = false;
        let result: Result<(), CheckoutError<String>> =
            place_order(&mut cart, CurrencyCode::USD, |_| {
                called = true;
                Ok(())
            });
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(!called);
    }
}
