//! Prices
//!
//! All amounts are Philippine pesos held as [`Money`] in minor units (centavos).

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// A peso amount.
pub type Price = Money<'static, Currency>;

/// Store currency.
pub const CURRENCY: &Currency = iso::PHP;

/// Number of minor-unit digits in [`CURRENCY`].
pub const MINOR_DIGITS: u32 = 2;

/// Errors converting between decimal amounts and [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),
}

/// A price from centavos.
#[must_use]
pub fn centavos(minor: i64) -> Price {
    Money::from_minor(minor, CURRENCY)
}

/// A price from whole pesos.
#[must_use]
pub fn pesos(whole: i64) -> Price {
    centavos(whole.saturating_mul(100))
}

/// Zero pesos.
#[must_use]
pub fn zero() -> Price {
    centavos(0)
}

/// Converts a decimal peso amount (as stored by the backend) into a [`Price`],
/// rounding half away from zero to the nearest centavo.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] when the amount overflows minor units.
pub fn from_decimal(amount: Decimal) -> Result<Price, PriceError> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .map(centavos)
        .ok_or(PriceError::OutOfRange(amount))
}

/// Converts a [`Price`] into a decimal peso amount.
#[must_use]
pub fn to_decimal(price: Price) -> Decimal {
    Decimal::new(price.to_minor_units(), MINOR_DIGITS)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_decimal_rounds_to_centavos() -> TestResult {
        assert_eq!(from_decimal(Decimal::new(14_505, 2))?, centavos(14_505));
        assert_eq!(from_decimal(Decimal::new(1_2345, 4))?, centavos(123));

        Ok(())
    }

    #[test]
    fn from_decimal_out_of_range_errors() {
        assert!(matches!(
            from_decimal(Decimal::MAX),
            Err(PriceError::OutOfRange(_))
        ));
    }

    #[test]
    fn to_decimal_keeps_two_digits() {
        assert_eq!(to_decimal(pesos(145)), Decimal::new(14_500, 2));
    }
}
