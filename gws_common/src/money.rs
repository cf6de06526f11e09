use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const CURRENCY_CODE: &str = "USD";

const CENTS_PER_UNIT: i64 = 100;

//--------------------------------------       Money         ---------------------------------------------------------

/// A fixed-precision monetary amount, stored as an integer number of cents.
///
/// All wallet arithmetic happens on this type (or on its SQL representation), so repeated credits
/// and debits never accumulate floating-point drift. The string form is a plain decimal with two
/// fractional digits, e.g. `100.00`, and that is also the serde representation.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(pub String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `Money::from_units(100)` is `100.00`.
    pub fn from_units(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    /// Parses a decimal amount with at most two fractional digits. `100`, `100.5` and `100.50`
    /// are all accepted; anything with more precision, or that is not a number, is rejected
    /// rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() || frac.len() > 2 || !is_all_digits(whole) || !is_all_digits_allow_empty(frac) {
            return Err(MoneyConversionError(s.to_string()));
        }
        let units = whole.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}: {e}")))?;
        let mut cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}: {e}")))? * 10,
            _ => frac.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}: {e}")))?,
        };
        cents += units.checked_mul(CENTS_PER_UNIT).ok_or_else(|| MoneyConversionError(s.to_string()))?;
        Ok(Self(sign * cents))
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_all_digits_allow_empty(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::Money;

    #[test]
    fn display_uses_two_decimal_places() {
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(10_050).to_string(), "100.50");
        assert_eq!(Money::from_cents(-4_000).to_string(), "-40.00");
    }

    #[test]
    fn parses_valid_amounts() {
        assert_eq!("100.00".parse::<Money>().unwrap(), Money::from_units(100));
        assert_eq!("100".parse::<Money>().unwrap(), Money::from_units(100));
        assert_eq!("100.5".parse::<Money>().unwrap(), Money::from_cents(10_050));
        assert_eq!(" 0.05 ".parse::<Money>().unwrap(), Money::from_cents(5));
        assert_eq!("-12.34".parse::<Money>().unwrap(), Money::from_cents(-1_234));
    }

    #[test]
    fn rejects_junk_and_excess_precision() {
        for bad in ["", "abc", "1.234", "1.2.3", "1,00", ".50", "1e3", "--1"] {
            assert!(bad.parse::<Money>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn round_trips_through_serde_as_string() {
        let m = Money::from_cents(123_456);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"1234.56\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn arithmetic_stays_exact() {
        let mut total = Money::zero();
        for _ in 0..1_000 {
            total = total + "0.10".parse::<Money>().unwrap();
        }
        assert_eq!(total, Money::from_units(100));
        total -= Money::from_units(100);
        assert_eq!(total, Money::zero());
        assert_eq!((-Money::from_units(5)).value(), -500);
        assert_eq!(Money::from_units(3) * 4, Money::from_units(12));
    }
}
