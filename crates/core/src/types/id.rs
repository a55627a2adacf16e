//! Product identifiers.
//!
//! The catalog API is not consistent about identifier types: the same product
//! can show up as `42` in one payload and `"42"` in another. [`RawId`] accepts
//! either form, and [`ProductId`] is the canonical string every comparison and
//! storage key goes through.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The identifier is empty (or only whitespace).
    #[error("product id cannot be empty")]
    Empty,
}

/// A product identifier as it appears on the wire: a JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric identifier (e.g. `42`).
    Number(serde_json::Number),
    /// String identifier (e.g. `"42"` or `"iphone-15-pro"`).
    Text(String),
}

impl From<i64> for RawId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<i32> for RawId {
    fn from(id: i32) -> Self {
        Self::Number(id.into())
    }
}

impl From<u64> for RawId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for RawId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for RawId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&String> for RawId {
    fn from(id: &String) -> Self {
        Self::Text(id.clone())
    }
}

impl From<&ProductId> for RawId {
    fn from(id: &ProductId) -> Self {
        Self::Text(id.0.clone())
    }
}

impl From<ProductId> for RawId {
    fn from(id: ProductId) -> Self {
        Self::Text(id.0)
    }
}

/// A canonical product identifier.
///
/// Always a non-empty, trimmed string. Numeric identifiers render in plain
/// decimal, so `42` and `"42"` normalize to the same `ProductId`.
///
/// ## Examples
///
/// ```
/// use mobistore_core::{ProductId, RawId};
///
/// let from_number = ProductId::normalize(&RawId::from(42)).unwrap();
/// let from_text = ProductId::normalize(&RawId::from(" 42 ")).unwrap();
/// assert_eq!(from_number, from_text);
/// assert_eq!(from_number.as_str(), "42");
///
/// assert!(ProductId::normalize(&RawId::from("")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Normalize a wire identifier into its canonical form.
    ///
    /// Returns `None` when the identifier carries no usable value.
    #[must_use]
    pub fn normalize(raw: &RawId) -> Option<Self> {
        match raw {
            RawId::Number(n) => canonical_number(n).map(Self),
            RawId::Text(s) => Self::parse(s).ok(),
        }
    }

    /// Parse a `ProductId` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Render a JSON number the way it would be written as an identifier.
///
/// Integral floats (`42.0`) collapse to `42` and `-0.0` to `0`; non-finite
/// values are unusable.
fn canonical_number(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    n.as_f64().filter(|f| f.is_finite()).map(|f| {
        // `-0.0` renders as "-0"; it is the same product as `0`.
        if f == 0.0 {
            "0".to_string()
        } else {
            f.to_string()
        }
    })
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_collide() {
        let a = ProductId::normalize(&RawId::from(42)).unwrap();
        let b = ProductId::normalize(&RawId::from("42")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_integral_float_renders_as_integer() {
        let raw: RawId = serde_json::from_str("42.0").unwrap();
        let id = ProductId::normalize(&raw).unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_negative_zero_float_matches_zero() {
        let raw: RawId = serde_json::from_str("-0.0").unwrap();
        let id = ProductId::normalize(&raw).unwrap();
        assert_eq!(id.as_str(), "0");
        assert_eq!(Some(id), ProductId::normalize(&RawId::from(0)));
    }

    #[test]
    fn test_fractional_float_keeps_fraction() {
        let raw: RawId = serde_json::from_str("1.5").unwrap();
        assert_eq!(ProductId::normalize(&raw).unwrap().as_str(), "1.5");
    }

    #[test]
    fn test_negative_number() {
        let id = ProductId::normalize(&RawId::from(-7_i64)).unwrap();
        assert_eq!(id.as_str(), "-7");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let id = ProductId::parse("  pixel-8  ").unwrap();
        assert_eq!(id.as_str(), "pixel-8");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(ProductIdError::Empty));
        assert!(ProductId::normalize(&RawId::from("")).is_none());
    }

    #[test]
    fn test_raw_id_deserializes_number_or_string() {
        let n: RawId = serde_json::from_str("17").unwrap();
        let s: RawId = serde_json::from_str("\"17\"").unwrap();
        assert!(matches!(n, RawId::Number(_)));
        assert!(matches!(s, RawId::Text(_)));
    }

    #[test]
    fn test_product_id_serializes_as_string() {
        let id = ProductId::normalize(&RawId::from(99)).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"99\"");
    }

    #[test]
    fn test_product_id_rejects_numeric_json() {
        // Stored records must already hold string ids.
        assert!(serde_json::from_str::<ProductId>("99").is_err());
    }

    #[test]
    fn test_product_id_rejects_empty_json_string() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }
}
