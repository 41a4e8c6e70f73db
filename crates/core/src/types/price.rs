//! Prices in the smallest currency unit.
//!
//! The marketplace prices everything in US cents. A price of zero is shown
//! as "Free"; anything else is shown as dollars with two decimal places.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(i64),
    /// The input is not a whole number of cents.
    #[error("price must be a whole number of cents")]
    NotAnInteger,
}

/// A non-negative price in cents.
///
/// ```
/// use digishelf_core::Price;
///
/// assert_eq!(Price::from_cents(0).unwrap().to_string(), "Free");
/// assert_eq!(Price::from_cents(799).unwrap().to_string(), "$7.99");
/// assert!(Price::from_cents(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    /// The zero price.
    pub const FREE: Self = Self(0);

    /// Create a price from a number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub const fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative(cents));
        }
        Ok(Self(cents))
    }

    /// Parse a price typed into a form field as a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not an integer or is negative.
    pub fn parse_cents(input: &str) -> Result<Self, PriceError> {
        let cents = input
            .trim()
            .parse::<i64>()
            .map_err(|_| PriceError::NotAnInteger)?;
        Self::from_cents(cents)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether this price is zero.
    #[must_use]
    pub const fn is_free(self) -> bool {
        self.0 == 0
    }

    /// Price of `quantity` units, saturating at `i64::MAX` cents.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Sum of two prices, saturating at `i64::MAX` cents.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        Self::from_cents(cents)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(self.0))
    }
}

/// Format an amount in cents for display.
///
/// `0` becomes `"Free"`; everything else becomes `"$D.CC"`.
#[must_use]
pub fn format_price(cents: i64) -> String {
    if cents == 0 {
        return "Free".to_string();
    }
    format!("${}", Decimal::new(cents, 2))
}
