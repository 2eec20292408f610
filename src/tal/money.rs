use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use thiserror::Error;

/// Number of `Money` units in one whole currency unit (4 decimal places)
const SCALE: i64 = 10_000;

const MAX_DECIMAL_PLACES: usize = 4;

#[derive(Error, Debug, PartialEq)]
pub enum MoneyError {
    #[error("Overflow error while applying {0} operation on {1:?} and {2:?}")]
    Overflow(&'static str, Money, Money),

    #[error("Underflow error while applying {0} operation on {1:?} and {2:?}")]
    Underflow(&'static str, Money, Money),

    #[error("Money parse error: {0}, {1}")]
    Parse(&'static str, String),
}

/// Fixed-point monetary amount, stored in ten-thousandths of a currency unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Builds an amount from a whole number of currency units
    pub fn from_units(units: i64) -> Result<Self, MoneyError> {
        units
            .checked_mul(SCALE)
            .map(Money)
            .ok_or_else(|| MoneyError::Parse("Amount out of range", units.to_string()))
    }

    /// Parses a decimal string such as `"1500"`, `"-12.5"` or `".25"`
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = digits.split('.');
        let whole = parts.next().unwrap_or("");
        let fraction = parts.next().unwrap_or("");

        if parts.next().is_some() {
            Err(MoneyError::Parse("Too many decimal points", input.to_string()))?
        }

        if whole.is_empty() && fraction.is_empty() {
            Err(MoneyError::Parse("No digits found", input.to_string()))?
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            Err(MoneyError::Parse("Unexpected character", input.to_string()))?
        }

        if fraction.len() > MAX_DECIMAL_PLACES {
            Err(MoneyError::Parse("Too many decimal places", input.to_string()))?
        }

        let out_of_range = || MoneyError::Parse("Amount out of range", input.to_string());

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };

        let fraction: i64 = format!("{:0<4}", fraction)
            .parse()
            .map_err(|_| out_of_range())?;

        let units = whole
            .checked_mul(SCALE)
            .and_then(|units| units.checked_add(fraction))
            .ok_or_else(out_of_range)?;

        return Ok(Money(if negative { -units } else { units }));
    }

    /// Converts a float holding at most four decimal places
    pub fn from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            Err(MoneyError::Parse("Amount is not a finite number", value.to_string()))?
        }

        let raw = value * SCALE as f64;
        let scaled = raw.round();

        // a few ulps of slack for binary noise like 0.1 * 10_000 = 1000.0000000000001
        if (raw - scaled).abs() > raw.abs().max(1.0) * f64::EPSILON * 4.0 {
            Err(MoneyError::Parse("Too many decimal places", value.to_string()))?
        }

        if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
            Err(MoneyError::Parse("Amount out of range", value.to_string()))?
        }

        return Ok(Money(scaled as i64));
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, MoneyError> {
        let a = self.0;
        let b = other.0;

        return match a.checked_add(b) {
            Some(sum) => Ok(Money(sum)),
            None if b > 0 => Err(MoneyError::Overflow("add", *self, *other)),
            None => Err(MoneyError::Underflow("add", *self, *other)),
        };
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, MoneyError> {
        let a = self.0;
        let b = other.0;

        return match a.checked_sub(b) {
            Some(diff) => Ok(Money(diff)),
            None if b > 0 => Err(MoneyError::Underflow("sub", *self, *other)),
            None => Err(MoneyError::Overflow("sub", *self, *other)),
        };
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u64;
        let fraction = abs % SCALE as u64;

        if fraction == 0 {
            return write!(f, "{sign}{whole}");
        }

        let fraction = format!("{fraction:04}");
        return write!(f, "{sign}{whole}.{}", fraction.trim_end_matches('0'));
    }
}

/// Whole amounts serialize as JSON integers, fractional ones as a float.
///
/// A fractional amount too large for a float to carry exactly is written as
/// its decimal string instead, which deserializes back to the same value.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % SCALE == 0 {
            return serializer.serialize_i64(self.0 / SCALE);
        }

        let value = self.0 as f64 / SCALE as f64;
        if Money::from_f64(value) == Ok(*self) {
            return serializer.serialize_f64(value);
        }

        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        Money::from_units(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        let value = i64::try_from(value)
            .map_err(|_| E::custom(MoneyError::Parse("Amount out of range", value.to_string())))?;

        self.visit_i64(value)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Money::from_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        Money::parse(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
