// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Precision context: significant digits plus rounding policy.

use crate::decimal;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

/// Significant digits used when no precision is configured.
pub const DEFAULT_PRECISION: u64 = 64;

/// Rounding policy applied whenever a value is reduced to a context's precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Away from zero
    Up,
    /// Towards zero
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// To nearest, ties away from zero
    #[default]
    HalfUp,
    /// To nearest, ties towards zero
    HalfDown,
    /// To nearest, ties to the even neighbour
    HalfEven,
}

impl From<Rounding> for RoundingMode {
    fn from(value: Rounding) -> Self {
        match value {
            Rounding::Up => RoundingMode::Up,
            Rounding::Down => RoundingMode::Down,
            Rounding::Ceiling => RoundingMode::Ceiling,
            Rounding::Floor => RoundingMode::Floor,
            Rounding::HalfUp => RoundingMode::HalfUp,
            Rounding::HalfDown => RoundingMode::HalfDown,
            Rounding::HalfEven => RoundingMode::HalfEven,
        }
    }
}

/// How many significant digits a computation carries and how it rounds.
///
/// Contexts are small `Copy` values. Algorithms derive wider working contexts from
/// the caller's one with [`with_extra_digits`](Self::with_extra_digits) and round
/// their final answer back with [`round`](Self::round).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrecisionContext {
    precision: NonZeroU64,
    rounding: Rounding,
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl PrecisionContext {
    /// Creates a context rounding half-up to `precision` significant digits.
    ///
    /// A precision of zero is raised to one digit.
    pub fn new(precision: u64) -> Self {
        Self {
            precision: NonZeroU64::new(precision).unwrap_or(NonZeroU64::MIN),
            rounding: Rounding::default(),
        }
    }

    pub fn with_rounding(self, rounding: Rounding) -> Self {
        Self { rounding, ..self }
    }

    /// Returns a context with the same rounding and `precision` digits.
    pub fn with_precision(self, precision: u64) -> Self {
        Self::new(precision).with_rounding(self.rounding)
    }

    /// Returns a context carrying `digits` guard digits on top of this one.
    pub fn with_extra_digits(self, digits: u64) -> Self {
        self.with_precision(self.precision().saturating_add(digits))
    }

    pub fn precision(&self) -> u64 {
        self.precision.get()
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Rounds `value` to this context's significant digits.
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        value.with_precision_round(self.precision, self.rounding.into())
    }

    /// Divides `dividend` by `divisor` at this context's precision.
    ///
    /// Returns `None` when `divisor` is zero.
    pub fn divide(&self, dividend: &BigDecimal, divisor: &BigDecimal) -> Option<BigDecimal> {
        decimal::divide(dividend, divisor, self.precision()).map(|q| self.round(&q))
    }

    /// Multiplies and rounds to this context's precision.
    pub fn multiply(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(&(a * b))
    }

    /// `10^-digits`
    pub fn epsilon(digits: u64) -> BigDecimal {
        decimal::ten_pow_neg(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_zero_precision_is_raised() {
        assert_eq!(PrecisionContext::new(0).precision(), 1);
    }

    #[test]
    fn test_extra_digits_keep_rounding() {
        let ctx = PrecisionContext::new(10).with_rounding(Rounding::Floor);
        let wide = ctx.with_extra_digits(5);
        assert_eq!(wide.precision(), 15);
        assert_eq!(wide.rounding(), Rounding::Floor);
    }

    #[test]
    fn test_round_modes() {
        let value = dec("2.345");
        let half_up = PrecisionContext::new(3);
        assert_eq!(half_up.round(&value), dec("2.35"));

        let down = half_up.with_rounding(Rounding::Down);
        assert_eq!(down.round(&value), dec("2.34"));

        let half_even = half_up.with_rounding(Rounding::HalfEven);
        assert_eq!(half_even.round(&value), dec("2.34"));
    }

    #[test]
    fn test_divide() {
        let ctx = PrecisionContext::new(20);
        let third = ctx.divide(&dec("1"), &dec("3")).unwrap();
        assert_eq!(third, dec("0.33333333333333333333"));

        let exact = ctx.divide(&dec("12"), &dec("0.004")).unwrap();
        assert_eq!(exact, dec("3000"));

        assert!(ctx.divide(&dec("1"), &dec("0")).is_none());
    }

    #[test]
    fn test_divide_signs() {
        let ctx = PrecisionContext::new(5);
        assert_eq!(ctx.divide(&dec("-2"), &dec("3")).unwrap(), dec("-0.66667"));
        assert_eq!(ctx.divide(&dec("-2"), &dec("-8")).unwrap(), dec("0.25"));
    }

    #[test]
    fn test_epsilon() {
        assert_eq!(PrecisionContext::epsilon(3), dec("0.001"));
        assert_eq!(PrecisionContext::epsilon(0), dec("1"));
    }
}
