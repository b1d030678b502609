// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! False position, plain and with Pegasus damping.

use crate::approximation::Approximation;
use crate::config::ApproximationConfig;
use crate::context::PrecisionContext;
use crate::decimal::{same_sign, ten_pow_neg};
use crate::errors::{ApproximationError, ApproximationResult, ConvergenceFailure};
use crate::function::{evaluate_offset, Domain, MathFunction};
use crate::quick_range::{QuickFindZeroRange, DEFAULT_TRIES};
use crate::range::{ApproximatedResult, Range};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use tracing::{debug, trace};

/// Guard digits carried over the requested precision while iterating.
pub const GUARD_DIGITS: u64 = 5;

/// Iteration ceiling of the plain variant.
pub const STANDARD_MAX_ITERATIONS: usize = 1000;

/// Iteration ceiling of the damped variant.
pub const EXTENDED_MAX_ITERATIONS: usize = 100;

/// Regula falsi root finder.
///
/// The plain variant keeps a sign-change bracket `[x1, x2]` and replaces the endpoint
/// whose residual has the sign of the new point. On convex functions one endpoint
/// then never moves and convergence is only linear. The extended variant applies
/// Pegasus damping to the retained endpoint's residual, which restores superlinear
/// convergence.
///
/// Both stop when `|f(z) - target|` or the bracket width is at most `10^(1-precision)`.
#[derive(Debug, Clone)]
pub struct RegulaFalsiApproximation<F> {
    function: F,
    extended: bool,
    bracket_tries: usize,
}

struct Endpoints {
    x1: BigDecimal,
    f1: BigDecimal,
    x2: BigDecimal,
    f2: BigDecimal,
}

impl<F: MathFunction> RegulaFalsiApproximation<F> {
    /// The plain variant.
    pub fn new(function: F) -> Self {
        Self {
            function,
            extended: false,
            bracket_tries: DEFAULT_TRIES,
        }
    }

    /// The Pegasus-damped variant.
    pub fn extended(function: F) -> Self {
        Self {
            function,
            extended: true,
            bracket_tries: DEFAULT_TRIES,
        }
    }

    /// Reads the `regula_falsi` and `quick_range` sections.
    pub fn from_config(function: F, config: &ApproximationConfig) -> Self {
        Self {
            function,
            extended: config.regula_falsi.extended,
            bracket_tries: config.quick_range.tries,
        }
    }

    /// Tries given to [`QuickFindZeroRange`] when `approximate` gets no search range.
    pub fn with_bracket_tries(mut self, tries: usize) -> Self {
        self.bracket_tries = tries;
        self
    }

    pub fn bracket_tries(&self) -> usize {
        self.bracket_tries
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn max_iterations(&self) -> usize {
        if self.extended {
            EXTENDED_MAX_ITERATIONS
        } else {
            STANDARD_MAX_ITERATIONS
        }
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    fn algorithm(&self) -> &'static str {
        if self.extended {
            "regula-falsi-extended"
        } else {
            "regula-falsi"
        }
    }

    /// Searches `[x_min, x_max]` and returns the root rounded to `ctx`.
    pub fn find_zero(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        x_min: &BigDecimal,
        x_max: &BigDecimal,
    ) -> ApproximationResult<BigDecimal> {
        self.iterate(ctx, target, x_min.clone(), x_max.clone())
            .map(ApproximatedResult::into_value)
    }

    fn iterate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        x_min: BigDecimal,
        x_max: BigDecimal,
    ) -> ApproximationResult<ApproximatedResult> {
        let algorithm = self.algorithm();
        let work = ctx.with_extra_digits(GUARD_DIGITS);
        let tolerance = ten_pow_neg(ctx.precision() - 1);
        let domain = self.function.domain();

        debug!(algorithm, precision = ctx.precision(), %target, "approximating");

        let (x1, f1) = evaluate_offset(&self.function, &domain, &work, target, x_min)?;
        if f1.is_zero() {
            return Ok(ApproximatedResult::converged(0, ctx.round(&x1)));
        }
        let (x2, f2) = evaluate_offset(&self.function, &domain, &work, target, x_max)?;
        if f2.is_zero() {
            return Ok(ApproximatedResult::converged(0, ctx.round(&x2)));
        }
        if same_sign(&f1, &f2) {
            return Err(ApproximationError::NoConvergence {
                algorithm,
                iterations: 0,
                reason: ConvergenceFailure::BracketNotFound,
            });
        }

        let mut ends = Endpoints { x1, f1, x2, f2 };
        let limit = self.max_iterations();
        for iterations in 1..=limit {
            let zero_denominator = ApproximationError::ZeroDenominator {
                algorithm,
                iterations,
            };
            let z = self
                .secant_point(&work, &domain, &ends)
                .ok_or_else(|| zero_denominator.clone())?;
            let (z, fz) = evaluate_offset(&self.function, &domain, &work, target, z)?;
            trace!(algorithm, iterations, %z, residual = %fz, "secant step");

            if fz.is_zero() || fz.abs() <= tolerance {
                let value = ctx.round(&z);
                debug!(algorithm, iterations, %value, "converged");
                return Ok(ApproximatedResult::converged(iterations, value));
            }

            if self.extended {
                if same_sign(&fz, &ends.f2) {
                    let damped = work
                        .divide(&(&ends.f1 * &ends.f2), &(&ends.f2 + &fz))
                        .ok_or(zero_denominator)?;
                    ends.f1 = damped;
                } else {
                    ends.x1 = ends.x2;
                    ends.f1 = ends.f2;
                }
                ends.x2 = z.clone();
                ends.f2 = fz;
            } else if same_sign(&fz, &ends.f1) {
                ends.x1 = z.clone();
                ends.f1 = fz;
            } else {
                ends.x2 = z.clone();
                ends.f2 = fz;
            }

            let bracket = Range::new(ends.x1.clone(), ends.x2.clone());
            if bracket.width() <= tolerance {
                let value = ctx.round(&z);
                debug!(algorithm, iterations, %value, "bracket collapsed");
                return Ok(ApproximatedResult::bracketed(iterations, value, bracket));
            }
        }

        Err(ApproximationError::NoConvergence {
            algorithm,
            iterations: limit,
            reason: ConvergenceFailure::IterationsExhausted,
        })
    }

    /// `x1 - (x2 - x1) / (f2 - f1) * f1`, clamped and rounded. `None` when `f2 == f1`.
    fn secant_point(
        &self,
        work: &PrecisionContext,
        domain: &Domain,
        ends: &Endpoints,
    ) -> Option<BigDecimal> {
        let slope = work.divide(&(&ends.x2 - &ends.x1), &(&ends.f2 - &ends.f1))?;
        let z = &ends.x1 - work.multiply(&slope, &ends.f1);
        Some(domain.clamp(z))
    }
}

impl<F: MathFunction> Approximation for RegulaFalsiApproximation<F> {
    fn approximate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        search_range: Option<&Range>,
    ) -> ApproximationResult<ApproximatedResult> {
        let range = match search_range {
            Some(range) => range.clone(),
            None => QuickFindZeroRange::find_range_with(
                ctx,
                &self.function,
                target,
                self.bracket_tries,
                None,
            ),
        };
        let (low, high) = range.into_bounds();
        self.iterate(ctx, target, low, high)
    }
}
