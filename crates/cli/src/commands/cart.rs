//! Cart commands.
//!
//! Each command opens the cart from file-backed storage, applies one
//! operation, and prints the resulting cart.
//!
//! # Environment Variables
//!
//! - `MOBISTORE_DATA_DIR` - Directory holding the cart record
//! - `MOBISTORE_CART_KEY` - Key the record is stored under
//! - `MOBISTORE_CURRENCY` - Currency for totals

use mobistore_core::CatalogProduct;
use mobistore_storefront::persistence::{self, LoadError};
use mobistore_storefront::{
    CartStorage, CartStore, CheckoutError, CheckoutPayload, FileStorage, StorageError,
    StorefrontConfig, place_order,
};
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// `--product-json` did not parse as a catalog product.
    #[error("Invalid product JSON: {0}")]
    InvalidProductJson(serde_json::Error),

    /// The product has no usable identifier.
    #[error("Product has no usable id")]
    MissingProductId,

    /// Reading the stored record failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored record could not be decoded.
    #[error("Stored cart is unreadable: {0}")]
    Unreadable(#[from] LoadError),

    /// Rendering output failed.
    #[error("Failed to render output: {0}")]
    Output(serde_json::Error),

    /// Checkout was requested on an empty cart.
    #[error("Cart is empty, nothing to check out")]
    EmptyCart,
}

/// Parse a catalog product from JSON.
///
/// # Errors
///
/// Returns `CartCommandError::InvalidProductJson` if the JSON does not match.
pub fn parse_product(json: &str) -> Result<CatalogProduct, CartCommandError> {
    serde_json::from_str(json).map_err(CartCommandError::InvalidProductJson)
}

fn open(config: &StorefrontConfig) -> CartStore<FileStorage> {
    CartStore::open(
        FileStorage::new(&config.data_dir),
        config.cart_key.as_str(),
    )
}

/// Print the cart.
///
/// # Errors
///
/// Returns `CartCommandError::Output` if JSON rendering fails.
pub fn show(config: &StorefrontConfig, json: bool) -> Result<(), CartCommandError> {
    let cart = open(config);
    if json {
        let rendered =
            serde_json::to_string_pretty(cart.items()).map_err(CartCommandError::Output)?;
        print_lines(&[rendered]);
    } else {
        print_cart(&cart, config);
    }
    Ok(())
}

/// Add `quantity` units of `product`.
///
/// # Errors
///
/// Returns `CartCommandError::MissingProductId` if the product has no usable id.
pub fn add(
    config: &StorefrontConfig,
    product: &CatalogProduct,
    quantity: i64,
) -> Result<(), CartCommandError> {
    let id = product
        .product_id()
        .ok_or(CartCommandError::MissingProductId)?;
    if quantity <= 0 {
        tracing::warn!(quantity, "Quantity must be positive, nothing added");
        return Ok(());
    }

    let mut cart = open(config);
    cart.add_item(product, quantity);
    tracing::info!(product_id = %id, quantity, "Add to cart");
    print_cart(&cart, config);
    Ok(())
}

/// Overwrite the quantity of the line for `id`.
pub fn update(config: &StorefrontConfig, id: &str, quantity: i64) {
    let mut cart = open(config);
    if cart.get(id).is_none() {
        tracing::warn!(product_id = id, "Product is not in the cart");
    }
    cart.update_quantity(id, quantity);
    print_cart(&cart, config);
}

/// Remove the line for `id`.
pub fn remove(config: &StorefrontConfig, id: &str) {
    let mut cart = open(config);
    cart.remove_item(id);
    print_cart(&cart, config);
}

/// Empty the cart.
pub fn clear(config: &StorefrontConfig) {
    let mut cart = open(config);
    cart.clear();
    tracing::info!("Cart cleared");
    print_cart(&cart, config);
}

/// Describe the stored record without modifying it.
///
/// Unlike opening the cart, this reports why a record would be discarded.
///
/// # Errors
///
/// Returns `CartCommandError` if the record cannot be read or decoded.
pub fn inspect(config: &StorefrontConfig) -> Result<(), CartCommandError> {
    let storage = FileStorage::new(&config.data_dir);
    let path = storage.path_for(&config.cart_key)?;
    let Some(raw) = storage.read(&config.cart_key)? else {
        print_lines(&[format!("No cart stored at {}", path.display())]);
        return Ok(());
    };

    let loaded = persistence::decode(&raw)?;
    let saved_at = loaded
        .saved_at
        .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
    print_lines(&[
        format!("Record:    {}", path.display()),
        format!(
            "Version:   {} (current {})",
            loaded.source_version,
            persistence::CURRENT_VERSION
        ),
        format!("Saved at:  {saved_at}"),
        format!("Items:     {}", loaded.items.len()),
        format!("Discarded: {}", loaded.discarded),
    ]);
    Ok(())
}

/// Print the order payload; with `confirm`, clear the cart as a successful
/// submission would.
///
/// # Errors
///
/// Returns `CartCommandError::EmptyCart` for an empty cart, or
/// `CartCommandError::Output` if JSON rendering fails.
pub fn checkout(config: &StorefrontConfig, confirm: bool) -> Result<(), CartCommandError> {
    let mut cart = open(config);

    if !confirm {
        let payload = CheckoutPayload::from_store(&cart, config.currency)
            .ok_or(CartCommandError::EmptyCart)?;
        print_payload(&payload)?;
        return Ok(());
    }

    let result = place_order(&mut cart, config.currency, |payload| {
        print_payload(payload).map(|()| payload.request_id)
    });
    match result {
        Ok(request_id) => {
            tracing::info!(%request_id, "Order submitted");
            Ok(())
        }
        Err(CheckoutError::EmptyCart) => Err(CartCommandError::EmptyCart),
        Err(CheckoutError::Submission(e)) => Err(e),
    }
}

fn print_payload(payload: &CheckoutPayload) -> Result<(), CartCommandError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CartCommandError::Output)?;
    print_lines(&[rendered]);
    Ok(())
}

fn print_cart<S: CartStorage>(cart: &CartStore<S>, config: &StorefrontConfig) {
    let summary = cart.summary(config.currency);
    if cart.is_empty() {
        print_lines(&["Cart is empty".to_string()]);
        return;
    }

    let symbol = config.currency.symbol();
    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{:>4} x {} [{}] @ {symbol}{:.2} = {symbol}{:.2}",
                item.quantity,
                item.product.display_name(),
                item.product.id,
                item.unit_price,
                item.line_total()
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), {} line(s), subtotal {}",
        summary.item_count, summary.line_count, summary.subtotal
    ));
    print_lines(&lines);
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
