//! Type-safe price representation using decimal arithmetic.
//!
//! Floating point is never used for money. A [`Price`] wraps a
//! `rust_decimal::Decimal` and guarantees the amount is non-negative; the
//! invariant is enforced at construction and at deserialization, so a
//! negative price cannot enter the system through the API or the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was negative.
    #[error("price must be non-negative, got {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount in the store's single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The cost of `quantity` copies at this price.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
