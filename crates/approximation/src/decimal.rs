// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Decimal helpers and the numeric coercion used by function implementations.

use crate::errors::EvaluationError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Zero};
use std::str::FromStr;

/// Digits computed beyond the requested precision before a quotient is rounded.
const DIVISION_GUARD_DIGITS: i64 = 3;

/// Converts a numeric value into the working decimal type.
///
/// Function implementations may produce their result in whatever numeric type is
/// convenient and normalize it through this trait.
pub trait ToDecimal {
    /// # Errors
    ///
    /// Returns `EvaluationError::NumberFormat` for values with no decimal
    /// representation, such as NaN, infinities or malformed strings.
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError>;
}

/// Normalizes any [`ToDecimal`] value to a `BigDecimal`.
pub fn to_decimal<T: ToDecimal + ?Sized>(value: &T) -> Result<BigDecimal, EvaluationError> {
    value.to_decimal()
}

impl ToDecimal for BigDecimal {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        Ok(self.clone())
    }
}

impl ToDecimal for BigInt {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        Ok(BigDecimal::from(self.clone()))
    }
}

macro_rules! impl_to_decimal_for_integer {
    ($($t:ty),*) => {
        $(
            impl ToDecimal for $t {
                fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
                    Ok(BigDecimal::from(*self))
                }
            }
        )*
    };
}

impl_to_decimal_for_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ToDecimal for f64 {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        if !self.is_finite() {
            return Err(EvaluationError::number_format(format!(
                "{self} has no decimal representation"
            )));
        }
        BigDecimal::from_f64(*self)
            .ok_or_else(|| EvaluationError::number_format(format!("cannot convert {self}")))
    }
}

impl ToDecimal for f32 {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        f64::from(*self).to_decimal()
    }
}

impl ToDecimal for str {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        BigDecimal::from_str(self.trim())
            .map_err(|err| EvaluationError::number_format(format!("'{self}': {err}")))
    }
}

impl ToDecimal for String {
    fn to_decimal(&self) -> Result<BigDecimal, EvaluationError> {
        self.as_str().to_decimal()
    }
}

/// `10^-digits`, with the exponent saturating at `i64::MAX`.
pub fn ten_pow_neg(digits: u64) -> BigDecimal {
    BigDecimal::new(BigInt::one(), i64::try_from(digits).unwrap_or(i64::MAX))
}

/// `0.5`, used to take exact midpoints.
pub(crate) fn one_half() -> BigDecimal {
    BigDecimal::new(BigInt::from(5u8), 1)
}

/// True when both values are non-zero with the same sign.
pub(crate) fn same_sign(a: &BigDecimal, b: &BigDecimal) -> bool {
    !a.is_zero() && a.sign() == b.sign()
}

fn decimal_digits(value: &BigInt) -> i64 {
    value.magnitude().to_str_radix(10).len() as i64
}

/// Digits before the decimal point of `|value|`; zero for magnitudes below one.
pub(crate) fn integer_digits(value: &BigDecimal) -> u64 {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    u64::try_from(decimal_digits(&mantissa).saturating_sub(scale)).unwrap_or(0)
}

/// Truncated quotient carrying at least `precision` significant digits plus guard
/// digits. Rounding to the final precision is left to the caller.
pub(crate) fn divide(
    dividend: &BigDecimal,
    divisor: &BigDecimal,
    precision: u64,
) -> Option<BigDecimal> {
    if divisor.is_zero() {
        return None;
    }
    if dividend.is_zero() {
        return Some(BigDecimal::zero());
    }

    let (numerator, numerator_scale) = dividend.as_bigint_and_exponent();
    let (denominator, denominator_scale) = divisor.as_bigint_and_exponent();

    let wanted = precision as i64 + DIVISION_GUARD_DIGITS;
    let shift = (wanted + decimal_digits(&denominator) - decimal_digits(&numerator)).max(0);
    let scaled = numerator * BigInt::from(10u8).pow(shift as u32);
    let quotient = scaled / denominator;

    Some(BigDecimal::new(
        quotient,
        numerator_scale - denominator_scale + shift,
    ))
}
