//! Product snapshots exchanged with the catalog API.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, RawId};
use super::price::RawPrice;

/// A product as supplied by the catalog API.
///
/// Every field is optional on the wire; the cart decides what is usable.
/// Unknown fields (stock, specs, ratings) are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Identifier, numeric or string.
    #[serde(default)]
    pub id: Option<RawId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Manufacturer brand (e.g. "Samsung").
    #[serde(default)]
    pub brand: Option<String>,
    /// Unit price, numeric or string.
    #[serde(default)]
    pub price: Option<RawPrice>,
    /// Image URL or path.
    #[serde(default)]
    pub image: Option<String>,
}

impl CatalogProduct {
    /// Create a catalog product with only an identifier set.
    #[must_use]
    pub fn new(id: impl Into<RawId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the price.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<RawPrice>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The normalized identifier, if this product has a usable one.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.id.as_ref().and_then(ProductId::normalize)
    }
}

/// A product as captured in the cart.
///
/// Same shape as [`CatalogProduct`] but with the identifier already in
/// canonical string form. The raw price is kept for display only; the cart
/// charges the unit price captured alongside the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Canonical identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Manufacturer brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Price as the catalog reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<RawPrice>,
    /// Image URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductSnapshot {
    /// Capture a catalog product. Returns `None` without a usable identifier.
    #[must_use]
    pub fn capture(product: &CatalogProduct) -> Option<Self> {
        let id = product.product_id()?;
        Some(Self {
            id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price.clone(),
            image: product.image.clone(),
        })
    }

    /// Name for display, falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
