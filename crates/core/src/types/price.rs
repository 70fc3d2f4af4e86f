//! Decimal prices and their display form.

use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store's single currency.
///
/// The backend sends prices either as JSON numbers or as decimal strings;
/// both deserialize. Arithmetic stays in [`Decimal`] so totals never pick up
/// floating point noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

/// Reasons a price typed into a form is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// Nothing was entered.
    #[error("Price is required")]
    Empty,
    /// Not a number, zero, or negative.
    #[error("Price must be a positive number")]
    NotPositive,
    /// Above [`Price::MAX_FORM_AMOUNT`].
    #[error("Price must be at most 1000000")]
    TooLarge,
}

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest price accepted from the menu item form.
    pub const MAX_FORM_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build a price from an amount in hundredths (`1550` is `15.50`).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a strictly positive price from form input.
    ///
    /// # Errors
    ///
    /// [`PriceError::Empty`] for blank input, [`PriceError::NotPositive`] for
    /// anything that is not a decimal number greater than zero,
    /// [`PriceError::TooLarge`] above [`Self::MAX_FORM_AMOUNT`].
    pub fn parse_positive(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::NotPositive)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount > Self::MAX_FORM_AMOUNT {
            return Err(PriceError::TooLarge);
        }

        Ok(Self(amount))
    }

    /// Format for display with two decimal places, e.g. `৳299.00`.
    #[must_use]
    pub fn display(&self, symbol: &str) -> String {
        format!("{symbol}{:.2}", self.0.round_dp(2))
    }
}

// Prices read back from the backend are unbounded, so totals saturate
// instead of overflowing.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_accepts_decimals() {
        assert_eq!(Price::parse_positive("299").unwrap(), Price::from_cents(29_900));
        assert_eq!(Price::parse_positive(" 15.5 ").unwrap(), Price::from_cents(1550));
    }

    #[test]
    fn test_parse_positive_rejects_negative_and_zero() {
        assert_eq!(Price::parse_positive("-5"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse_positive("0"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse_positive("abc"), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_parse_positive_rejects_huge_amounts() {
        assert_eq!(
            Price::parse_positive("1000000").unwrap(),
            Price::new(Price::MAX_FORM_AMOUNT)
        );
        assert_eq!(Price::parse_positive("1000000.01"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse_positive("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max + Price::from_cents(100), max);
    }

    #[test]
    fn test_parse_positive_rejects_blank() {
        assert_eq!(Price::parse_positive("  "), Err(PriceError::Empty));
    }

    #[test]
    fn test_display_pads_two_places() {
        assert_eq!(Price::from_cents(29_900).display("৳"), "৳299.00");
        assert_eq!(Price::from_cents(1550).display("$"), "$15.50");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("24.5").unwrap();
        let from_string: Price = serde_json::from_str("\"24.50\"").unwrap();
        assert_eq!(from_number.display("$"), "$24.50");
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_line_totals() {
        let total: Price = [Price::from_cents(1550) * 2, Price::from_cents(1200)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(4300));
    }
}
