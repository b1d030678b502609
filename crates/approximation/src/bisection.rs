// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Bisection with automatic bracket expansion.

use crate::approximation::Approximation;
use crate::config::BisectionConfig;
use crate::context::PrecisionContext;
use crate::decimal::{integer_digits, same_sign, ten_pow_neg};
use crate::errors::{
    ApproximationError, ApproximationResult, ConvergenceFailure, EvaluationError,
};
use crate::function::{evaluate_offset, Domain, MathFunction};
use crate::range::{ApproximatedResult, Range};
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use tracing::{debug, trace, warn};

const ALGORITHM: &str = "bisection";

/// Lowest accepted iteration budget. Smaller budgets cannot even finish expanding
/// the default bracket.
pub const MIN_ITERATIONS: usize = 10;

/// Highest accepted iteration budget. 300 digits of accuracy from a unit bracket take
/// about 1000 halvings; the cap leaves room for expansion on top.
pub const MAX_ITERATIONS: usize = 2000;

/// Digits of accuracy used when none are configured.
pub const DEFAULT_ACCURACY: u64 = 300;

/// Guard digits carried beyond `max(precision, accuracy)` so midpoints keep their
/// last accurate digit through rounding. Refinement adds the integer digits of the
/// bracket on top, since `accuracy` counts digits after the decimal point.
pub const GUARD_DIGITS: u64 = 5;

/// Bisection root finder bound to one function.
///
/// Finds `x` with `f(x) = target` by first growing a bracket until the function
/// crosses the target and then halving it until `|f(x) - target|` or the bracket
/// width is at most `10^-accuracy`.
#[derive(Debug, Clone)]
pub struct BiSectionApproximation<F> {
    function: F,
    max_iterations: usize,
    accuracy: u64,
    iterate_close_without_convergence: bool,
}

impl<F: MathFunction> BiSectionApproximation<F> {
    pub fn new(function: F) -> Self {
        Self {
            function,
            max_iterations: MAX_ITERATIONS,
            accuracy: DEFAULT_ACCURACY,
            iterate_close_without_convergence: false,
        }
    }

    pub fn from_config(function: F, config: &BisectionConfig) -> Self {
        Self::new(function)
            .with_max_iterations(config.max_iterations)
            .with_accuracy(config.accuracy)
            .iterate_close_without_convergence(config.iterate_close_without_convergence)
    }

    /// Sets the iteration budget, clamped to `[MIN_ITERATIONS, MAX_ITERATIONS]`.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        self
    }

    /// Sets the accuracy in decimal digits.
    pub fn with_accuracy(mut self, accuracy: u64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// When set, an exhausted budget or a number format failure returns the best
    /// estimate instead of an error.
    pub fn iterate_close_without_convergence(mut self, enabled: bool) -> Self {
        self.iterate_close_without_convergence = enabled;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn accuracy(&self) -> u64 {
        self.accuracy
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    fn no_convergence(
        &self,
        iterations: usize,
        reason: ConvergenceFailure,
    ) -> ApproximationError {
        ApproximationError::NoConvergence {
            algorithm: ALGORITHM,
            iterations,
            reason,
        }
    }

    fn evaluate(
        &self,
        domain: &Domain,
        work: &PrecisionContext,
        target: &BigDecimal,
        x: BigDecimal,
    ) -> Result<(BigDecimal, BigDecimal), EvaluationError> {
        evaluate_offset(&self.function, domain, work, target, x)
    }
}

impl<F: MathFunction> Approximation for BiSectionApproximation<F> {
    fn approximate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        search_range: Option<&Range>,
    ) -> ApproximationResult<ApproximatedResult> {
        let work = ctx.with_precision(ctx.precision().max(self.accuracy) + GUARD_DIGITS);
        let epsilon = ten_pow_neg(self.accuracy);
        let domain = self.function.domain();
        let (low, high) = search_range.cloned().unwrap_or_else(Range::unit).into_bounds();

        debug!(
            algorithm = ALGORITHM,
            precision = ctx.precision(),
            accuracy = self.accuracy,
            %target,
            "approximating"
        );

        let mut iterations = 0;
        let (mut x1, mut f1) = self.evaluate(&domain, &work, target, low)?;
        if f1.is_zero() {
            return Ok(ApproximatedResult::converged(iterations, ctx.round(&x1)));
        }
        let (mut x2, mut f2) = self.evaluate(&domain, &work, target, high)?;
        if f2.is_zero() {
            return Ok(ApproximatedResult::converged(iterations, ctx.round(&x2)));
        }

        // Expand until the function crosses the target.
        let two = BigDecimal::from(2);
        let mut step = BigDecimal::one();
        while same_sign(&f1, &f2) {
            if iterations >= self.max_iterations {
                break;
            }
            iterations += 1;
            step = &step * &two;

            let (nx1, nf1) = self.evaluate(&domain, &work, target, &x1 - &step)?;
            let (nx2, nf2) = self.evaluate(&domain, &work, target, &x2 + &step)?;
            let stalled = nx1 == x1 && nx2 == x2;
            (x1, f1, x2, f2) = (nx1, nf1, nx2, nf2);
            trace!(algorithm = ALGORITHM, iterations, %x1, %x2, "expanded bracket");

            if f1.is_zero() {
                return Ok(ApproximatedResult::converged(iterations, ctx.round(&x1)));
            }
            if f2.is_zero() {
                return Ok(ApproximatedResult::converged(iterations, ctx.round(&x2)));
            }
            if stalled {
                break;
            }
        }

        if same_sign(&f1, &f2) {
            if !self.iterate_close_without_convergence {
                return Err(self.no_convergence(iterations, ConvergenceFailure::BracketNotFound));
            }
            warn!(
                algorithm = ALGORITHM,
                iterations,
                %x1,
                %x2,
                "no sign change found, refining best bracket"
            );
        }

        // Halve the bracket.
        let magnitude = x1.abs().max(x2.abs());
        let work = work.with_extra_digits(integer_digits(&magnitude));
        loop {
            let bracket = Range::new(x1.clone(), x2.clone());
            let mid = bracket.midpoint();
            if iterations >= self.max_iterations {
                if self.iterate_close_without_convergence {
                    warn!(
                        algorithm = ALGORITHM,
                        iterations, "iteration limit reached, returning midpoint"
                    );
                    let value = ctx.round(&mid);
                    return Ok(ApproximatedResult::bracketed(iterations, value, bracket));
                }
                return Err(
                    self.no_convergence(iterations, ConvergenceFailure::IterationsExhausted)
                );
            }
            iterations += 1;

            let (x3, f3) = match self.evaluate(&domain, &work, target, mid.clone()) {
                Ok(evaluated) => evaluated,
                Err(EvaluationError::NumberFormat { message }) => {
                    if self.iterate_close_without_convergence {
                        warn!(
                            algorithm = ALGORITHM,
                            iterations,
                            %message,
                            "accepting midpoint after number format error"
                        );
                        let value = ctx.round(&mid);
                        return Ok(ApproximatedResult::bracketed(iterations, value, bracket));
                    }
                    return Err(
                        self.no_convergence(iterations, ConvergenceFailure::EvaluationFailed)
                    );
                }
                Err(err) => return Err(err.into()),
            };

            if f3.is_zero() {
                debug!(algorithm = ALGORITHM, iterations, "exact hit");
                return Ok(ApproximatedResult::converged(iterations, ctx.round(&x3)));
            }

            let residual_small = f3.abs() <= epsilon;
            if same_sign(&f3, &f1) {
                x1 = x3.clone();
                f1 = f3;
            } else {
                x2 = x3.clone();
            }
            trace!(algorithm = ALGORITHM, iterations, %x1, %x2, "halved bracket");

            let bracket = Range::new(x1.clone(), x2.clone());
            if residual_small || bracket.width() <= epsilon {
                let value = ctx.round(&x3);
                debug!(algorithm = ALGORITHM, iterations, %value, "converged");
                return Ok(ApproximatedResult::bracketed(iterations, value, bracket));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{from_fn, BoundedMathFunction};
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn square() -> impl MathFunction + Clone {
        from_fn(|ctx: &PrecisionContext, x: &BigDecimal| Ok(ctx.multiply(x, x)))
    }

    #[test]
    fn test_square_root_of_four() {
        let ctx = PrecisionContext::new(64);
        let bisection = BiSectionApproximation::new(square()).with_accuracy(50);
        let range = Range::new(dec("0"), dec("10"));
        let result = bisection
            .approximate(&ctx, &dec("4"), Some(&range))
            .unwrap();

        assert!(result.used_iterations() > 0);
        let error = (result.approximated_value() - dec("2")).abs();
        assert!(error <= ten_pow_neg(50), "error {error}");
        let bracket = result.approximation_range().unwrap();
        assert!(bracket.width() <= dec("10"));
    }

    #[test]
    fn test_large_root_keeps_shrinking() {
        let ctx = PrecisionContext::new(64);
        let bisection = BiSectionApproximation::new(square());
        let range = Range::new(dec("0"), dec("2e6"));
        let result = bisection.approximate(&ctx, &dec("2e12"), Some(&range)).unwrap();

        assert!(result.used_iterations() < MAX_ITERATIONS);
        let expected = dec("2e12").sqrt().unwrap();
        assert!((result.approximated_value() - expected).abs() <= ten_pow_neg(50));
        if let Some(bracket) = result.approximation_range() {
            assert!(bracket.width() <= ten_pow_neg(DEFAULT_ACCURACY));
        }
    }

    #[test]
    fn test_expands_from_default_range() {
        let ctx = PrecisionContext::new(40);
        let f = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x - dec("123.25")));
        let bisection = BiSectionApproximation::new(f).with_accuracy(30);
        let result = bisection.approximate(&ctx, &BigDecimal::zero(), None).unwrap();
        let error = (result.approximated_value() - dec("123.25")).abs();
        assert!(error <= ten_pow_neg(30));
    }

    #[test]
    fn test_exact_hit_has_no_range() {
        let ctx = PrecisionContext::new(20);
        let f = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x.clone()));
        let result = BiSectionApproximation::new(f)
            .approximate(&ctx, &BigDecimal::zero(), None)
            .unwrap();
        assert_eq!(result.approximated_value(), &dec("0"));
        assert!(result.approximation_range().is_none());
        assert_eq!(result.used_iterations(), 1);
    }

    #[test]
    fn test_max_iterations_are_clamped() {
        let bisection = BiSectionApproximation::new(square());
        assert_eq!(bisection.clone().with_max_iterations(1).max_iterations(), MIN_ITERATIONS);
        assert_eq!(bisection.with_max_iterations(10_000).max_iterations(), MAX_ITERATIONS);
    }

    #[test]
    fn test_unreachable_target_fails() {
        let ctx = PrecisionContext::new(20);
        let bisection = BiSectionApproximation::new(square()).with_max_iterations(20);
        let err = bisection
            .approximate(&ctx, &dec("-1"), None)
            .unwrap_err();
        assert_eq!(
            err,
            ApproximationError::NoConvergence {
                algorithm: "bisection",
                iterations: 20,
                reason: ConvergenceFailure::BracketNotFound,
            }
        );
    }

    #[test]
    fn test_exhausted_refinement_fails_closed() {
        let ctx = PrecisionContext::new(64);
        let bisection = BiSectionApproximation::new(square())
            .with_max_iterations(10)
            .with_accuracy(50);
        let range = Range::new(dec("0"), dec("10"));
        let err = bisection.approximate(&ctx, &dec("2"), Some(&range)).unwrap_err();
        assert!(matches!(
            err,
            ApproximationError::NoConvergence {
                reason: ConvergenceFailure::IterationsExhausted,
                iterations: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_best_effort_returns_estimate() {
        let ctx = PrecisionContext::new(64);
        let bisection = BiSectionApproximation::new(square())
            .with_max_iterations(10)
            .with_accuracy(50)
            .iterate_close_without_convergence(true);
        let range = Range::new(dec("0"), dec("10"));
        let result = bisection.approximate(&ctx, &dec("2"), Some(&range)).unwrap();
        assert_eq!(result.used_iterations(), 10);
        let bracket = result.approximation_range().unwrap();
        assert!(bracket.contains(&dec("1.4142")));
    }

    #[test]
    fn test_number_format_error() {
        let ctx = PrecisionContext::new(20);
        let f = from_fn(|_: &PrecisionContext, x: &BigDecimal| {
            if x.is_zero() || x.abs() >= dec("1") {
                Ok(x.clone() - dec("0.5"))
            } else {
                Err(EvaluationError::number_format("unsupported input"))
            }
        });
        let range = Range::new(dec("-1"), dec("1"));

        let strict = BiSectionApproximation::new(&f);
        let err = strict.approximate(&ctx, &BigDecimal::zero(), Some(&range)).unwrap_err();
        assert!(matches!(
            err,
            ApproximationError::NoConvergence {
                reason: ConvergenceFailure::EvaluationFailed,
                ..
            }
        ));

        let lenient = BiSectionApproximation::new(&f).iterate_close_without_convergence(true);
        let result = lenient
            .approximate(&ctx, &BigDecimal::zero(), Some(&range))
            .unwrap();
        assert_eq!(result.approximated_value(), &dec("0.5"));
    }

    #[test]
    fn test_other_evaluation_errors_propagate() {
        let ctx = PrecisionContext::new(20);
        let f = from_fn(|_: &PrecisionContext, _: &BigDecimal| {
            Err(EvaluationError::domain("nowhere defined"))
        });
        let err = BiSectionApproximation::new(f)
            .approximate(&ctx, &BigDecimal::zero(), None)
            .unwrap_err();
        assert_eq!(err, ApproximationError::Evaluation(EvaluationError::domain("nowhere defined")));
    }

    #[test]
    fn test_candidates_are_clamped_to_domain() {
        let ctx = PrecisionContext::new(40);
        let f = BoundedMathFunction::new(square(), Some(dec("0")), None);
        let bisection = BiSectionApproximation::new(f).with_accuracy(30);
        let result = bisection.approximate(&ctx, &dec("16"), None).unwrap();
        let error = (result.approximated_value() - dec("4")).abs();
        assert!(error <= ten_pow_neg(30));
        assert!(result.approximation_range().unwrap().low() >= &dec("0"));
    }

    #[test]
    fn test_stalled_expansion_fails_early() {
        let ctx = PrecisionContext::new(20);
        let f = BoundedMathFunction::new(square(), Some(dec("-2")), Some(dec("2")));
        let err = BiSectionApproximation::new(f)
            .approximate(&ctx, &dec("100"), None)
            .unwrap_err();
        assert_eq!(
            err,
            ApproximationError::NoConvergence {
                algorithm: "bisection",
                iterations: 2,
                reason: ConvergenceFailure::BracketNotFound,
            }
        );
    }
}
