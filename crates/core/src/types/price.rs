//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are exact decimals, so summing many cart lines never drifts the way
//! binary floats do. The only lossy step is [`Price::to_minor_units`], which
//! rounds half away from zero instead of truncating.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency's standard unit (dollars, not cents).
///
/// Catalog prices are non-negative (enforced by the `products.price` check
/// constraint). Line totals derived via [`Price::times`] take the quantity
/// literally, so a line with a non-positive quantity yields a zero or negative
/// amount rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places shown to shoppers.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Unit price multiplied by a line quantity.
    #[must_use]
    pub fn times(self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Amount in the smallest currency unit (cents), rounded half away from zero.
    ///
    /// Returns `None` only if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    fn rounded_for_display(self) -> Decimal {
        let mut amount = self
            .0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(Self::DISPLAY_SCALE);
        amount
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.rounded_for_display();
        if amount.is_sign_negative() && !amount.is_zero() {
            write!(f, "-${}", amount.abs())
        } else {
            write!(f, "${}", amount.abs())
        }
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for Price {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <Decimal as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for Price {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, ::sqlx::error::BoxDynError> {
        let amount = <Decimal as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <Decimal as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [price("10.0").times(2), price("20.0").times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, price("80"));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::zero());
    }

    #[test]
    fn test_decimal_sum_has_no_drift() {
        let total: Price = (0..10).map(|_| price("0.10")).sum();
        assert_eq!(total, price("1.00"));
    }

    #[test]
    fn test_non_positive_quantity_is_literal() {
        assert_eq!(price("5.00").times(0), Price::zero());
        assert_eq!(price("5.00").times(-2), price("-10.00"));
    }

    #[test]
    fn test_minor_units_round_not_truncate() {
        assert_eq!(price("19.999").to_minor_units(), Some(2000));
        assert_eq!(price("0.005").to_minor_units(), Some(1));
        assert_eq!(price("0.004").to_minor_units(), Some(0));
        assert_eq!(price("-0.005").to_minor_units(), Some(-1));
    }

    #[test]
    fn test_display() {
        assert_eq!(price("20").to_string(), "$20.00");
        assert_eq!(price("999.99").to_string(), "$999.99");
        assert_eq!(price("1.005").to_string(), "$1.01");
        assert_eq!(price("-3").to_string(), "-$3.00");
        assert_eq!(Price::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&price("12.50")).unwrap();
        assert_eq!(json, "\"12.50\"");
    }
}
