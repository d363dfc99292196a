//! Unit price of a catalog product.
//!
//! The cart only stores the price it was handed by the catalog; it never
//! computes totals or converts currencies. Amounts are kept as
//! [`Decimal`] to avoid float drift while the snapshot still carries a
//! plain JSON number (`"price": 10.5`).

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of a single unit, in the store's currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitPrice(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl UnitPrice {
    /// Create a unit price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a unit price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for UnitPrice {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::str::FromStr for UnitPrice {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Decimal>().map(Self)
    }
}
