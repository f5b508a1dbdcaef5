//! Fixed-point monetary type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so batch totals are
//! accumulated without floating-point error. Both families total their
//! trailers through this type.

use rust_decimal::Decimal;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// A decimal amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use payment_batch::Money;
/// use rust_decimal::Decimal;
///
/// let amount = Money::from_minor_units(Decimal::from(1050));
/// assert_eq!(amount.as_decimal().to_string(), "10.50");
/// assert_eq!(amount.minor_units(), Decimal::from(1050));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money` from a `Decimal`, normalizing to 2 decimal places.
    ///
    /// Digits beyond the second decimal place are rounded with banker's rounding.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value.round_dp(Self::SCALE);
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Creates an amount from a count of cents.
    pub fn from_minor_units(cents: Decimal) -> Self {
        Money::new(cents / Decimal::ONE_HUNDRED)
    }

    /// Amount expressed in whole cents.
    pub fn minor_units(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}
