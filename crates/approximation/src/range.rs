// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Search brackets and approximation results.

use crate::decimal::one_half;
use bigdecimal::BigDecimal;
use num_traits::One;
use std::fmt;

/// An inclusive interval `[low, high]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    low: BigDecimal,
    high: BigDecimal,
}

impl Range {
    /// Creates a range from two endpoints in either order.
    pub fn new(a: BigDecimal, b: BigDecimal) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The default starting bracket `[-1, 1]`.
    pub fn unit() -> Self {
        Self {
            low: -BigDecimal::one(),
            high: BigDecimal::one(),
        }
    }

    pub fn low(&self) -> &BigDecimal {
        &self.low
    }

    pub fn high(&self) -> &BigDecimal {
        &self.high
    }

    pub fn width(&self) -> BigDecimal {
        &self.high - &self.low
    }

    /// Exact midpoint of the two endpoints.
    pub fn midpoint(&self) -> BigDecimal {
        (&self.low + &self.high) * one_half()
    }

    pub fn contains(&self, x: &BigDecimal) -> bool {
        &self.low <= x && x <= &self.high
    }

    pub fn into_bounds(self) -> (BigDecimal, BigDecimal) {
        (self.low, self.high)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Outcome of a successful approximation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproximatedResult {
    used_iterations: usize,
    approximated_value: BigDecimal,
    approximation_range: Option<Range>,
}

impl ApproximatedResult {
    /// A result that converged on a point; no bracket is reported.
    pub fn converged(used_iterations: usize, approximated_value: BigDecimal) -> Self {
        Self {
            used_iterations,
            approximated_value,
            approximation_range: None,
        }
    }

    /// A result that terminated by narrowing `range`.
    pub fn bracketed(used_iterations: usize, approximated_value: BigDecimal, range: Range) -> Self {
        Self {
            used_iterations,
            approximated_value,
            approximation_range: Some(range),
        }
    }

    pub fn used_iterations(&self) -> usize {
        self.used_iterations
    }

    pub fn approximated_value(&self) -> &BigDecimal {
        &self.approximated_value
    }

    pub fn approximation_range(&self) -> Option<&Range> {
        self.approximation_range.as_ref()
    }

    pub fn into_value(self) -> BigDecimal {
        self.approximated_value
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
    fn test_range_normalizes_order() {
        let range = Range::new(dec("5"), dec("-2"));
        assert_eq!(range.low(), &dec("-2"));
        assert_eq!(range.high(), &dec("5"));
        assert_eq!(range.width(), dec("7"));
    }

    #[test]
    fn test_midpoint_is_exact() {
        let range = Range::new(dec("0"), dec("1e-40"));
        assert_eq!(range.midpoint(), dec("5e-41"));
        assert_eq!(Range::unit().midpoint(), dec("0"));
    }

    #[test]
    fn test_contains() {
        let range = Range::unit();
        assert!(range.contains(&dec("1")));
        assert!(range.contains(&dec("-0.5")));
        assert!(!range.contains(&dec("1.01")));
        assert_eq!(range.to_string(), "[-1, 1]");
    }

    #[test]
    fn test_result_accessors() {
        let result = ApproximatedResult::bracketed(3, dec("2"), Range::unit());
        assert_eq!(result.used_iterations(), 3);
        assert_eq!(result.approximation_range(), Some(&Range::unit()));
        assert!(ApproximatedResult::converged(1, dec("2"))
            .approximation_range()
            .is_none());
        assert_eq!(result.into_value(), dec("2"));
    }
}
