// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Newton-Raphson iteration.

use crate::approximation::Approximation;
use crate::config::ApproximationConfig;
use crate::context::PrecisionContext;
use crate::decimal::ten_pow_neg;
use crate::derivative::DerivateNumericalApproximation;
use crate::errors::{ApproximationError, ApproximationResult, ConvergenceFailure};
use crate::function::{evaluate_clamped, evaluate_offset, MathFunction};
use crate::quick_range::{QuickFindZeroRange, DEFAULT_TRIES};
use crate::range::{ApproximatedResult, Range};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::sync::Arc;
use tracing::{debug, trace};

const ALGORITHM: &str = "newton-raphson";

/// Iteration ceiling used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Guard digits carried over the requested precision while iterating.
pub const GUARD_DIGITS: u64 = 16;

/// Newton-Raphson root finder.
///
/// Iterates `x' = clamp(x - (f(x) - target) / f'(x))` until successive iterates differ
/// by at most `10^-precision`. The derivative is either supplied or the numeric
/// derivative of `f`.
#[derive(Debug)]
pub struct NewtonRhapsonApproximation<F, D = DerivateNumericalApproximation<Arc<F>>> {
    function: Arc<F>,
    derivative: D,
    max_iterations: usize,
    bracket_tries: usize,
}

impl<F: MathFunction> NewtonRhapsonApproximation<F> {
    /// Uses the numeric derivative of `function`.
    pub fn new(function: F) -> Self {
        let function = Arc::new(function);
        Self {
            derivative: DerivateNumericalApproximation::new(Arc::clone(&function)),
            function,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            bracket_tries: DEFAULT_TRIES,
        }
    }

    /// Reads the `newton` and `quick_range` sections.
    pub fn from_config(function: F, config: &ApproximationConfig) -> Self {
        Self::new(function)
            .with_max_iterations(config.newton.max_iterations)
            .with_bracket_tries(config.quick_range.tries)
    }
}

impl<F: MathFunction, D: MathFunction> NewtonRhapsonApproximation<F, D> {
    pub fn with_derivative(function: F, derivative: D) -> Self {
        Self {
            function: Arc::new(function),
            derivative,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            bracket_tries: DEFAULT_TRIES,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Tries given to [`QuickFindZeroRange`] when `approximate` gets no search range.
    pub fn with_bracket_tries(mut self, tries: usize) -> Self {
        self.bracket_tries = tries;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn bracket_tries(&self) -> usize {
        self.bracket_tries
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    pub fn derivative(&self) -> &D {
        &self.derivative
    }

    /// Iterates from `initial_guess` and returns the root rounded to `ctx`.
    pub fn find_zero(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        initial_guess: &BigDecimal,
    ) -> ApproximationResult<BigDecimal> {
        self.iterate(ctx, target, initial_guess)
            .map(ApproximatedResult::into_value)
    }

    fn iterate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        initial_guess: &BigDecimal,
    ) -> ApproximationResult<ApproximatedResult> {
        let work = ctx.with_extra_digits(GUARD_DIGITS);
        let epsilon = ten_pow_neg(ctx.precision());
        let domain = self.function.domain();
        let derivative_domain = self.derivative.domain();

        debug!(
            algorithm = ALGORITHM,
            precision = ctx.precision(),
            %target,
            guess = %initial_guess,
            "approximating"
        );

        let mut x = initial_guess.clone();
        for iterations in 1..=self.max_iterations {
            let (current, fx) = evaluate_offset(&*self.function, &domain, &work, target, x)?;
            if fx.is_zero() {
                debug!(algorithm = ALGORITHM, iterations, "exact hit");
                return Ok(ApproximatedResult::converged(iterations, ctx.round(&current)));
            }

            let (_, slope) =
                evaluate_clamped(&self.derivative, &derivative_domain, &work, current.clone())?;
            let Some(step) = work.divide(&fx, &slope) else {
                return Err(ApproximationError::NoConvergence {
                    algorithm: ALGORITHM,
                    iterations,
                    reason: ConvergenceFailure::ZeroDerivative,
                });
            };

            let next = work.round(&domain.clamp(&current - &step));
            trace!(algorithm = ALGORITHM, iterations, x = %next, "step");
            if (&next - &current).abs() <= epsilon {
                let value = ctx.round(&next);
                debug!(algorithm = ALGORITHM, iterations, %value, "converged");
                return Ok(ApproximatedResult::converged(iterations, value));
            }
            x = next;
        }

        Err(ApproximationError::NoConvergence {
            algorithm: ALGORITHM,
            iterations: self.max_iterations,
            reason: ConvergenceFailure::IterationsExhausted,
        })
    }
}

impl<F: MathFunction, D: MathFunction> Approximation for NewtonRhapsonApproximation<F, D> {
    /// Starts from the midpoint of `search_range`, or of a quickly located bracket.
    fn approximate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        search_range: Option<&Range>,
    ) -> ApproximationResult<ApproximatedResult> {
        let guess = match search_range {
            Some(range) => range.midpoint(),
            None => QuickFindZeroRange::find_range_with(
                ctx,
                &*self.function,
                target,
                self.bracket_tries,
                None,
            )
            .midpoint(),
        };
        self.iterate(ctx, target, &guess)
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

    fn sqrt2(digits: u64) -> BigDecimal {
        dec("2").sqrt().unwrap().with_prec(digits)
    }

    #[test]
    fn test_square_root_numeric_derivative() {
        let ctx = PrecisionContext::new(40);
        let f = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| Ok(ctx.multiply(x, x)));
        let newton = NewtonRhapsonApproximation::new(f);
        let root = newton.find_zero(&ctx, &dec("2"), &dec("1")).unwrap();
        assert!((root - sqrt2(40)).abs() <= ten_pow_neg(38));
    }

    #[test]
    fn test_explicit_derivative() {
        let ctx = PrecisionContext::new(30);
        let f = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| {
            Ok(ctx.multiply(x, x) - dec("2"))
        });
        let df = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x * dec("2")));
        let newton = NewtonRhapsonApproximation::with_derivative(f, df);
        let result = newton
            .approximate(&ctx, &BigDecimal::zero(), Some(&Range::new(dec("1"), dec("2"))))
            .unwrap();
        assert!(result.used_iterations() < DEFAULT_MAX_ITERATIONS);
        assert!(result.approximation_range().is_none());
        assert!((result.approximated_value() - sqrt2(30)).abs() <= ten_pow_neg(28));
    }

    #[test]
    fn test_zero_derivative_is_fatal() {
        let ctx = PrecisionContext::new(30);
        let f = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| {
            Ok(ctx.multiply(x, x) - dec("2"))
        });
        let df = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x * dec("2")));
        let err = NewtonRhapsonApproximation::with_derivative(f, df)
            .find_zero(&ctx, &BigDecimal::zero(), &BigDecimal::zero())
            .unwrap_err();
        assert_eq!(
            err,
            ApproximationError::NoConvergence {
                algorithm: "newton-raphson",
                iterations: 1,
                reason: ConvergenceFailure::ZeroDerivative,
            }
        );
    }

    #[test]
    fn test_iteration_ceiling() {
        let ctx = PrecisionContext::new(30);
        // x^2 + 1 has no real root; the iterates wander forever.
        let f = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| {
            Ok(ctx.multiply(x, x) + dec("1"))
        });
        let df = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x * dec("2")));
        let err = NewtonRhapsonApproximation::with_derivative(f, df)
            .with_max_iterations(25)
            .find_zero(&ctx, &BigDecimal::zero(), &dec("0.5"))
            .unwrap_err();
        assert!(matches!(
            err,
            ApproximationError::NoConvergence {
                iterations: 25,
                reason: ConvergenceFailure::IterationsExhausted,
                ..
            }
        ));
    }

    #[test]
    fn test_iterates_stay_in_domain() {
        let ctx = PrecisionContext::new(30);
        let f = BoundedMathFunction::new(
            from_fn(|ctx: &PrecisionContext, x: &BigDecimal| Ok(ctx.multiply(x, x))),
            Some(dec("0.5")),
            None,
        );
        let newton = NewtonRhapsonApproximation::new(f);
        let root = newton.find_zero(&ctx, &dec("9"), &dec("-10")).unwrap();
        assert!((root - dec("3")).abs() <= ten_pow_neg(28));
    }

    #[test]
    fn test_approximate_locates_bracket_first() {
        let ctx = PrecisionContext::new(30);
        let f = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x * dec("4")));
        let newton = NewtonRhapsonApproximation::new(f);
        let result = newton.approximate(&ctx, &dec("50"), None).unwrap();
        assert!((result.approximated_value() - dec("12.5")).abs() <= ten_pow_neg(28));
    }

    #[test]
    fn test_converges_at_pinned_bound() {
        let ctx = PrecisionContext::new(30);
        let f = BoundedMathFunction::new(
            from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x.clone())),
            Some(dec("1")),
            None,
        );
        let df = from_fn(|_: &PrecisionContext, _: &BigDecimal| Ok(dec("1")));
        let result = NewtonRhapsonApproximation::with_derivative(f, df)
            .approximate(&ctx, &BigDecimal::zero(), Some(&Range::new(dec("5"), dec("5"))))
            .unwrap();
        assert_eq!(result.approximated_value(), &dec("1"));
        assert_eq!(result.used_iterations(), 2);
    }

    #[test]
    fn test_from_config_reads_bracket_tries() {
        let mut config = ApproximationConfig::default();
        config.newton.max_iterations = 40;
        config.quick_range.tries = 3;
        let f = from_fn(|_: &PrecisionContext, x: &BigDecimal| Ok(x * dec("4")));
        let newton = NewtonRhapsonApproximation::from_config(f, &config);
        assert_eq!(newton.max_iterations(), 40);
        assert_eq!(newton.bracket_tries(), 3);

        let ctx = PrecisionContext::new(30);
        let result = newton.approximate(&ctx, &dec("50"), None).unwrap();
        assert!((result.approximated_value() - dec("12.5")).abs() <= ten_pow_neg(28));
    }
}
