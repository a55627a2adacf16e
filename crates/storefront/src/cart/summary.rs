use mobistore_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Cart totals for the header badge and cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities.
    pub item_count: u64,
    /// Number of distinct products.
    pub line_count: usize,
    pub subtotal: Price,
}

impl CartSummary {
    #[must_use]
    pub const fn new(
        item_count: u64,
        line_count: usize,
        subtotal: Decimal,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            item_count,
            line_count,
            subtotal: Price::new(subtotal, currency),
        }
    }

    /// An empty cart's summary.
    #[must_use]
    pub const fn empty(currency: CurrencyCode) -> Self {
        Self::new(0, 0, Decimal::ZERO, currency)
    }
}
