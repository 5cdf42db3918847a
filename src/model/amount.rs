//! Amount type for handling monetary values entered by hand.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! parsing values that may or may not include a Rand sign and commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a Rand amount.
///
/// This type wraps `Decimal` and accepts input that may be formatted with a currency
/// prefix (`R`) or thousands separators, e.g. `R 1,250.00` and `1250` parse to the
/// same value. It always serializes as a plain decimal string so the stored ledger
/// stays machine-readable.
///
/// # Examples
///
/// ```
/// # use pocket_ledger::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("R 1,250.50").unwrap();
/// let b = Amount::from_str("1250.50").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.value.abs())
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Remove the currency prefix if present: "R 50", "R50", "-R50" and "R -50"
        // all work.
        let without_sign = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_rand) = strip_rand(after_minus) {
                format!("-{after_rand}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_rand) = strip_rand(trimmed) {
            after_rand.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_sign.replace(',', "");

        let value = Decimal::from_str(without_commas.trim()).map_err(AmountError)?;
        Ok(Amount { value })
    }
}

/// Strips a leading `R` or `r` currency marker, plus any whitespace after it.
fn strip_rand(s: &str) -> Option<&str> {
    s.strip_prefix(['R', 'r']).map(str::trim_start)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            (String::from("-"), self.value().abs())
        } else {
            (String::new(), self.value())
        };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as a plain decimal string, no currency sign or commas
        serializer.serialize_str(&self.value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept both the string form we write ("100.50") and bare JSON numbers
        // (100, 75.5), which older or hand-edited config files contain.
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or a number")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Amount::from_str(v).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Amount::new(Decimal::from(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Amount::new(Decimal::from(v)))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Decimal::try_from(v).map(Amount::new).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_rand_sign() {
        let amount = Amount::from_str("R50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_with_rand_sign_and_space() {
        let amount = Amount::from_str("R 50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_rand_sign() {
        let amount = Amount::from_str("-R50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_rand_then_negative() {
        let amount = Amount::from_str("R -50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("R 1,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1000.00").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  R 50.00  ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string_is_an_error() {
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(Amount::from_str("lots").is_err());
    }

    #[test]
    fn test_display_positive() {
        let amount = Amount::new(Decimal::from_str("1250.5").unwrap());
        assert_eq!(amount.to_string(), "1,250.50");
    }

    #[test]
    fn test_display_negative() {
        let amount = Amount::new(Decimal::from_str("-50.00").unwrap());
        assert_eq!(amount.to_string(), "-50.00");
    }

    #[test]
    fn test_serialize_plain() {
        let amount = Amount::from_str("R 1,000.50").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1000.50\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"-12.34\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-12.34").unwrap());
    }

    #[test]
    fn test_deserialize_bare_number() {
        // Hand-edited files carry bare numbers instead of strings
        let amount: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("100").unwrap());

        let amount: Amount = serde_json::from_str("75.5").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("75.5").unwrap());

        let amount: Amount = serde_json::from_str("-12").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-12").unwrap());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_is_positive_and_negative() {
        assert!(Amount::from_str("50").unwrap().is_positive());
        assert!(Amount::from_str("-50").unwrap().is_negative());
    }

    #[test]
    fn test_abs() {
        let amount = Amount::from_str("-50").unwrap();
        assert_eq!(amount.abs(), Amount::from_str("50").unwrap());
    }
}
