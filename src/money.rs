use std::fmt::{self, Display};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional digits every amount is stored with.
pub const SCALE: u32 = 2;

/// Total number of digits an amount may have, fractional digits included.
pub const MAX_DIGITS: u32 = 10;

/// A non-negative currency amount with exactly two fractional digits.
///
/// Amounts are exact decimals; comparisons never go through floating point.
/// Deserialization accepts either a JSON number or a string and validates the
/// amount; numbers are read from their literal text, never as `f64`.
/// Serialization always produces a string such as `"100.00"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Result<Money, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }

        if amount.normalize().scale() > SCALE {
            return Err(MoneyError::TooPrecise);
        }

        let mut amount = amount.abs();
        amount.rescale(SCALE);

        if amount >= Decimal::new(10i64.pow(MAX_DIGITS - SCALE), 0) {
            return Err(MoneyError::TooLarge);
        }

        Ok(Money(amount))
    }

    pub fn zero() -> Money {
        Money(Decimal::new(0, SCALE))
    }

    /// Every `u32` number of cents fits within the allowed digits.
    pub fn from_cents(cents: u32) -> Money {
        Money(Decimal::new(i64::from(cents), SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Money {
        Money::zero()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = MoneyError;
    fn from_str(s: &str) -> Result<Money, MoneyError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| MoneyError::Unparseable)?;
        Money::new(amount)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::new(amount).map_err(D::Error::custom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoneyError {
    Unparseable,
    Negative,
    TooPrecise,
    TooLarge,
}

impl Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Unparseable => write!(f, "the amount is not a decimal number"),
            MoneyError::Negative => write!(f, "the amount must not be negative"),
            MoneyError::TooPrecise => {
                write!(f, "the amount must have no more than {} decimal places", SCALE)
            }
            MoneyError::TooLarge => write!(
                f,
                "the amount must have no more than {} digits in total",
                MAX_DIGITS
            ),
        }
    }
}

impl std::error::Error for MoneyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_two_decimal_places() {
        assert_eq!("80".parse::<Money>().unwrap().to_string(), "80.00");
        assert_eq!("79.9".parse::<Money>().unwrap().to_string(), "79.90");
        assert_eq!("1.500".parse::<Money>().unwrap().to_string(), "1.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::from_cents(7999).to_string(), "79.99");
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!("-0.01".parse::<Money>().unwrap_err(), MoneyError::Negative);
        assert_eq!("-0.00".parse::<Money>().unwrap().to_string(), "0.00");
    }

    #[test]
    fn rejects_more_than_two_decimal_places() {
        assert_eq!("1.005".parse::<Money>().unwrap_err(), MoneyError::TooPrecise);
    }

    #[test]
    fn rejects_more_than_ten_digits() {
        assert!("99999999.99".parse::<Money>().is_ok());
        assert_eq!("100000000".parse::<Money>().unwrap_err(), MoneyError::TooLarge);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("twelve".parse::<Money>().unwrap_err(), MoneyError::Unparseable);
    }

    #[test]
    fn deserializes_from_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("79.99").unwrap();
        let from_integer: Money = serde_json::from_str("80").unwrap();
        let from_string: Money = serde_json::from_str("\"79.99\"").unwrap();

        assert_eq!(from_number, Money::from_cents(7999));
        assert_eq!(from_integer, Money::from_cents(8000));
        assert_eq!(from_string, Money::from_cents(7999));
        assert!(serde_json::from_str::<Money>("-5").is_err());
    }

    #[test]
    fn numbers_keep_every_digit_they_were_sent_with() {
        let error = serde_json::from_str::<Money>("79.99999999999999999").unwrap_err();
        assert!(error.to_string().contains("decimal places"), "{}", error);

        let exact: Money = serde_json::from_str("99999999.99").unwrap();
        assert_eq!(exact.to_string(), "99999999.99");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(10000)).unwrap();

        assert_eq!(json, "\"100.00\"");
    }
}
