//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog payloads carry prices as JSON numbers or strings (`29.99` or
//! `"29.99"`). [`RawPrice`] accepts both; [`Price::normalize`] turns whatever
//! arrived into a finite, non-negative [`Decimal`], falling back to zero.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price as it appears on the wire: a JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// Numeric price (e.g. `29.99`).
    Number(serde_json::Number),
    /// Textual price (e.g. `"29.99"`).
    Text(String),
}

impl From<&str> for RawPrice {
    fn from(price: &str) -> Self {
        Self::Text(price.to_owned())
    }
}

impl From<String> for RawPrice {
    fn from(price: String) -> Self {
        Self::Text(price)
    }
}

impl From<i64> for RawPrice {
    fn from(price: i64) -> Self {
        Self::Number(price.into())
    }
}

impl From<f64> for RawPrice {
    /// Non-finite values have no JSON representation and become `"NaN"`-style
    /// text, which later normalizes to zero.
    fn from(price: f64) -> Self {
        serde_json::Number::from_f64(price)
            .map_or_else(|| Self::Text(price.to_string()), Self::Number)
    }
}

impl From<Decimal> for RawPrice {
    fn from(price: Decimal) -> Self {
        Self::Text(price.to_string())
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Coerce a loosely typed price into a finite, non-negative amount.
    ///
    /// Missing, unparseable, non-finite and negative inputs all become zero.
    ///
    /// ```
    /// use mobistore_core::{Price, RawPrice};
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Price::normalize(Some(&RawPrice::from("29.99"))), Decimal::new(2999, 2));
    /// assert_eq!(Price::normalize(Some(&RawPrice::from("abc"))), Decimal::ZERO);
    /// assert_eq!(Price::normalize(None), Decimal::ZERO);
    /// ```
    #[must_use]
    pub fn normalize(raw: Option<&RawPrice>) -> Decimal {
        let parsed = match raw {
            Some(RawPrice::Number(n)) => parse_decimal(&n.to_string()),
            Some(RawPrice::Text(s)) => parse_decimal(s.trim()),
            None => None,
        };
        parsed
            .filter(|amount| !amount.is_sign_negative())
            .unwrap_or(Decimal::ZERO)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Parse plain (`29.99`) or scientific (`2.999e1`) decimal notation.
fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyCodeError(s.to_owned())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn normalize_json(json: &str) -> Decimal {
        let raw: RawPrice = serde_json::from_str(json).unwrap();
        Price::normalize(Some(&raw))
    }

    #[test]
    fn test_string_price() {
        assert_eq!(normalize_json("\"29.99\""), Decimal::new(2999, 2));
    }

    #[test]
    fn test_numeric_price() {
        assert_eq!(normalize_json("29.99"), Decimal::new(2999, 2));
        assert_eq!(normalize_json("100"), Decimal::from(100));
    }

    #[test]
    fn test_price_with_whitespace() {
        assert_eq!(normalize_json("\" 5.50 \""), Decimal::new(550, 2));
    }

    #[test]
    fn test_unparseable_price_is_zero() {
        assert_eq!(normalize_json("\"abc\""), Decimal::ZERO);
        assert_eq!(normalize_json("\"\""), Decimal::ZERO);
        assert_eq!(normalize_json("\"29.99abc\""), Decimal::ZERO);
    }

    #[test]
    fn test_non_finite_price_is_zero() {
        assert_eq!(Price::normalize(Some(&RawPrice::from(f64::NAN))), Decimal::ZERO);
        assert_eq!(
            Price::normalize(Some(&RawPrice::from(f64::INFINITY))),
            Decimal::ZERO
        );
        assert_eq!(normalize_json("\"NaN\""), Decimal::ZERO);
        assert_eq!(normalize_json("\"Infinity\""), Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_is_zero() {
        assert_eq!(normalize_json("-3"), Decimal::ZERO);
        assert_eq!(normalize_json("\"-0.01\""), Decimal::ZERO);
    }

    #[test]
    fn test_missing_price_is_zero() {
        assert_eq!(Price::normalize(None), Decimal::ZERO);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(normalize_json("\"1.5e2\""), Decimal::from(150));
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(5998, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "$59.98");
        let price = Price::new(Decimal::from(5), CurrencyCode::GBP);
        assert_eq!(price.to_string(), "£5.00");
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert_eq!(" AUD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::AUD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
