//! Price representation using decimal arithmetic.
//!
//! The remote API stores prices as plain numbers in US dollars. `Price`
//! accepts either JSON numbers or numeric strings and always displays with
//! two decimal places.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A dollar amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Percentage saved when buying at `sale` instead of `list`.
///
/// Rounded to the nearest whole percent, halves rounding up. Returns `0` when
/// the list price is not positive or the sale price is above the list price.
#[must_use]
pub fn discount_percent(list: Price, sale: Price) -> u32 {
    if !list.is_positive() {
        return 0;
    }

    let ratio = (list.0 - sale.0) / list.0 * Decimal::ONE_HUNDRED;
    ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(price("19").display(), "$19.00");
        assert_eq!(price("19.5").display(), "$19.50");
        assert_eq!(price("0").display(), "$0.00");
    }

    #[test]
    fn test_deserialize_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("49.99").unwrap();
        let from_string: Price = serde_json::from_str("\"49.99\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.display(), "$49.99");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(price("100"), price("75")), 25);
        assert_eq!(discount_percent(price("3"), price("2")), 33);
        assert_eq!(discount_percent(price("8"), price("7.9")), 1);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 12.5% off
        assert_eq!(discount_percent(price("8"), price("7")), 13);
    }

    #[test]
    fn test_discount_zero_without_list_price() {
        assert_eq!(discount_percent(Price::ZERO, price("10")), 0);
        assert_eq!(discount_percent(price("-5"), price("10")), 0);
    }

    #[test]
    fn test_discount_zero_when_sale_above_list() {
        assert_eq!(discount_percent(price("10"), price("15")), 0);
    }
}
