//! Exact-decimal units for money and CO2 mass.
//!
//! Savings are accumulated over many purchases, so both quantities use
//! `rust_decimal` rather than floats: `2 × 1.58` is exactly `3.16`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in Norwegian kroner.
///
/// Serializes as a plain JSON number or string (whatever the backend sent
/// is accepted on the way in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kroner(Decimal);

impl Kroner {
    /// Zero kroner.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a whole-krone amount.
    #[must_use]
    pub fn whole(kroner: i64) -> Self {
        Self(Decimal::from(kroner))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Kroner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kr", self.0)
    }
}

impl FromStr for Kroner {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Kroner {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Kroner {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Kroner {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A mass of CO2 in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Co2Kg(Decimal);

impl Co2Kg {
    /// Zero kilograms.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a mass from a decimal value.
    #[must_use]
    pub const fn new(kg: Decimal) -> Self {
        Self(kg)
    }

    /// Get the underlying decimal mass.
    #[must_use]
    pub const fn kilograms(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Co2Kg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kg CO2", self.0)
    }
}

impl FromStr for Co2Kg {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Co2Kg {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Co2Kg {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}
