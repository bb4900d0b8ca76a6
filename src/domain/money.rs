use crate::error::ReceiptError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative monetary amount with exactly two fractional digits.
///
/// Wraps `rust_decimal::Decimal` so parsing never goes through binary floating
/// point. Arithmetic on amounts is done in integer cents via [`Amount::cents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, ReceiptError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ReceiptError::validation(format!(
                "Amount must not be negative: {}",
                value
            )));
        }

        let mut value = value.normalize();
        if value.scale() > 2 {
            return Err(ReceiptError::validation(format!(
                "Amount has more than two fractional digits: {}",
                value
            )));
        }
        value.rescale(2);

        if i64::try_from(value.mantissa()).is_err() {
            return Err(ReceiptError::validation(format!(
                "Amount is out of range: {}",
                value
            )));
        }

        Ok(Self(value))
    }

    /// Builds an amount from a whole number of cents.
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The amount in minor units. Always non-negative.
    pub fn cents(&self) -> u64 {
        // scale is pinned to 2 and the mantissa range checked in `new`
        self.0.mantissa().unsigned_abs() as u64
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ReceiptError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0)).is_ok());
        assert!(Amount::new(dec!(6.49)).is_ok());
        assert!(Amount::new(dec!(6.490)).is_ok());
        assert!(matches!(
            Amount::new(dec!(-0.01)),
            Err(ReceiptError::ValidationFailed(_))
        ));
        assert!(matches!(
            Amount::new(dec!(1.005)),
            Err(ReceiptError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_amount_cents() {
        assert_eq!(Amount::new(dec!(35.35)).unwrap().cents(), 3535);
        assert_eq!(Amount::new(dec!(9)).unwrap().cents(), 900);
        assert_eq!(Amount::new(dec!(0.5)).unwrap().cents(), 50);
        assert_eq!(Amount::from_cents(625).value(), dec!(6.25));
    }

    #[test]
    fn test_amount_display_uses_two_digits() {
        assert_eq!(Amount::new(dec!(9)).unwrap().to_string(), "9.00");
        assert_eq!(Amount::new(dec!(12.250)).unwrap().to_string(), "12.25");
    }

    #[test]
    fn test_amount_serde_rejects_negative() {
        let ok: Amount = serde_json::from_str("\"2.25\"").unwrap();
        assert_eq!(ok.cents(), 225);
        assert!(serde_json::from_str::<Amount>("\"-2.25\"").is_err());
    }
}
