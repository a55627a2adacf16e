use mobistore_core::{CatalogProduct, Price, ProductId, ProductSnapshot, RawPrice};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One product's entry in the cart.
///
/// `unit_price` is captured when the line is created and does not follow
/// later catalog price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product as it looked when first added.
    pub product: ProductSnapshot,
    /// Always positive.
    pub quantity: u64,
    /// Finite and non-negative.
    #[serde(default, deserialize_with = "stored_unit_price")]
    pub unit_price: Decimal,
}

/// Stored prices go through the same coercion as catalog prices, so a missing,
/// `null` or unparseable value loads as zero instead of dropping the line.
fn stored_unit_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = serde_json::from_value::<RawPrice>(value).ok();
    Ok(Price::normalize(raw.as_ref()))
}

impl LineItem {
    /// Create a line for `product`, deriving the unit price from its price field.
    ///
    /// Returns `None` if the product has no usable identifier or `quantity` is zero.
    #[must_use]
    pub fn new(product: &CatalogProduct, quantity: u64) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        let snapshot = ProductSnapshot::capture(product)?;
        Some(Self {
            unit_price: Price::normalize(snapshot.price.as_ref()),
            product: snapshot,
            quantity,
        })
    }

    /// Canonical identifier of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// `unit_price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_unit_price() {
        let product = CatalogProduct::new(1).with_price("29.99");
        let line = LineItem::new(&product, 2).unwrap();
        assert_eq!(line.unit_price, Decimal::new(2999, 2));
        assert_eq!(line.product_id().as_str(), "1");
        assert_eq!(line.line_total(), Decimal::new(5998, 2));
    }

    #[test]
    fn test_new_rejects_zero_quantity() {
        assert!(LineItem::new(&CatalogProduct::new(1), 0).is_none());
    }

    #[test]
    fn test_new_rejects_missing_id() {
        assert!(LineItem::new(&CatalogProduct::default(), 1).is_none());
    }

    #[test]
    fn test_malformed_price_is_zero() {
        let line = LineItem::new(&CatalogProduct::new(1).with_price("free"), 1).unwrap();
        assert_eq!(line.unit_price, Decimal::ZERO);
    }

    #[test]
    fn test_line_total_saturates() {
        let product = CatalogProduct::new(1).with_price(Decimal::MAX);
        let line = LineItem::new(&product, u64::MAX).unwrap();
        assert_eq!(line.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_unit_price_serializes_as_string() {
        let line = LineItem::new(&CatalogProduct::new(9).with_price(5_i64), 1).unwrap();
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["unit_price"], serde_json::json!("5"));
        assert_eq!(json["product"]["id"], serde_json::json!("9"));
    }

    #[test]
    fn test_unit_price_deserializes_from_number() {
        let json = r#"{"product":{"id":"9"},"quantity":1,"unit_price":12.5}"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.unit_price, Decimal::new(125, 1));
    }

    #[test]
    fn test_unreadable_stored_price_deserializes_as_zero() {
        for json in [
            r#"{"product":{"id":"9"},"quantity":1,"unit_price":"abc"}"#,
            r#"{"product":{"id":"9"},"quantity":1,"unit_price":null}"#,
            r#"{"product":{"id":"9"},"quantity":1,"unit_price":true}"#,
            r#"{"product":{"id":"9"},"quantity":1}"#,
        ] {
            let line: LineItem = serde_json::from_str(json).unwrap();
            assert_eq!(line.unit_price, Decimal::ZERO, "{json}");
        }
    }
}
