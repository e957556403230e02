//! Value Objects for point-of-sale orders

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Money value object, integer minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: i64) -> Self { Self(amount) }
    pub fn amount(&self) -> i64 { self.0 }
    pub fn is_negative(&self) -> bool { self.0 < 0 }

    pub fn add(&self, other: Money) -> Result<Money> {
        self.0.checked_add(other.0).map(Money).ok_or_else(|| overflow("total"))
    }

    pub fn subtract(&self, other: Money) -> Result<Money> {
        self.0.checked_sub(other.0).map(Money).ok_or_else(|| overflow("difference"))
    }

    pub fn multiply(&self, qty: Quantity) -> Result<Money> {
        self.0.checked_mul(i64::from(qty.value())).map(Money).ok_or_else(|| overflow("line total"))
    }
}

fn overflow(what: &str) -> Error {
    Error::Validation(format!("{what} is out of range"))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Quantity value object. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i32) -> Result<Self> {
        if value <= 0 {
            return Err(Error::Validation(format!("quantity must be positive, got {value}")));
        }
        Ok(Self(value))
    }
    pub fn value(&self) -> i32 { self.0 }
    pub fn add(&self, other: Quantity) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| Error::Validation("quantity is out of range".into()))
    }
    pub fn fits_in(&self, stock: i32) -> bool { self.0 <= stock }
}

impl TryFrom<i32> for Quantity {
    type Error = Error;
    fn try_from(value: i32) -> Result<Self> { Self::new(value) }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> i32 { q.0 }
}

/// Short human readable receipt identifier: one uppercase letter and three digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptCode(String);

impl ReceiptCode {
    pub const MIN_NUMBER: u16 = 100;
    pub const MAX_NUMBER: u16 = 999;

    /// Builds a code from the first character of `name` and `number`.
    pub fn compose(name: &str, number: u16) -> Result<Self> {
        let first = name
            .trim()
            .chars()
            .next()
            .ok_or_else(|| Error::Validation("display name must not be empty".into()))?;
        if !(Self::MIN_NUMBER..=Self::MAX_NUMBER).contains(&number) {
            return Err(Error::Validation(format!("receipt number {number} out of range")));
        }
        let prefix: String = first.to_uppercase().collect();
        Ok(Self(format!("{prefix}{number}")))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ReceiptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_multiply() {
        let price = Money::new(100);
        assert_eq!(price.multiply(Quantity::new(3).unwrap()).unwrap(), Money::new(300));
    }

    #[test]
    fn test_money_overflow_is_rejected() {
        let price = Money::new(i64::MAX / 2);
        assert!(matches!(price.multiply(Quantity::new(3).unwrap()), Err(Error::Validation(_))));
        assert!(Money::new(i64::MAX).add(Money::new(1)).is_err());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-4).is_err());
        assert!(Quantity::new(5).unwrap().fits_in(5));
        assert!(!Quantity::new(6).unwrap().fits_in(5));
    }

    #[test]
    fn test_receipt_code() {
        assert_eq!(ReceiptCode::compose("budi", 123).unwrap().as_str(), "B123");
        assert_eq!(ReceiptCode::compose("  ana", 999).unwrap().as_str(), "A999");
        assert!(ReceiptCode::compose("", 123).is_err());
        assert!(ReceiptCode::compose("x", 99).is_err());
    }
}
