use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

pub const DEFAULT_CURRENCY: &str = "USD";

/// A decimal number of units in a single currency.
///
/// The number keeps the scale it was parsed with, so `-15.00` renders as
/// `-15.00 USD` rather than `-15 USD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(number: Decimal, currency: &str) -> Self {
        Amount {
            number,
            currency: currency.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.number.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Amount {
            number: -self.number,
            currency: self.currency,
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        -self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn usd(s: &str) -> Amount {
        Amount::new(Decimal::from_str(s).unwrap(), "USD")
    }

    #[test]
    fn display_keeps_scale() {
        assert_eq!(usd("-15.00").to_string(), "-15.00 USD");
        assert_eq!(usd("413.54").to_string(), "413.54 USD");
    }

    #[test]
    fn negation_flips_sign_and_keeps_currency() {
        let neg = -usd("357.51");
        assert_eq!(neg.to_string(), "-357.51 USD");
        assert_eq!(-&neg, usd("357.51"));
    }

    #[test]
    fn zero_with_scale_is_zero() {
        assert!(usd("0.00").is_zero());
        assert!(usd("-0").is_zero());
        assert!(!usd("0.01").is_zero());
    }
}
