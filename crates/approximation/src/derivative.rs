// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::PrecisionContext;
use crate::decimal::ten_pow_neg;
use crate::errors::EvaluationError;
use crate::function::{evaluate_clamped, Domain, MathFunction};
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

/// Digits carried by the difference quotient beyond the requested precision.
pub const DERIVATIVE_GUARD_DIGITS: u64 = 10;

/// Numeric first derivative of a source function.
///
/// At `x = 0` a forward difference with step `10^-p` is taken, elsewhere a symmetric
/// relative perturbation `x * (1 ± 10^-p)`, where `p` is the requested precision. The
/// source is evaluated at `2p + 10` digits so the difference of the two values keeps
/// `p + 10` significant digits. Perturbed points are clamped to the source's domain
/// and the quotient divides by the span actually used.
#[derive(Debug, Clone)]
pub struct DerivateNumericalApproximation<F> {
    function: F,
}

impl<F: MathFunction> DerivateNumericalApproximation<F> {
    pub fn new(function: F) -> Self {
        Self { function }
    }

    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F: MathFunction> MathFunction for DerivateNumericalApproximation<F> {
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        let precision = ctx.precision();
        let evaluation = ctx.with_precision(2 * precision + DERIVATIVE_GUARD_DIGITS);
        let quotient = ctx.with_extra_digits(DERIVATIVE_GUARD_DIGITS);
        let domain = self.function.domain();
        let h = ten_pow_neg(precision);

        let (left, right) = if input.is_zero() {
            (input.clone(), input + &h)
        } else {
            let one = BigDecimal::one();
            (input * (&one - &h), input * (&one + &h))
        };

        let (left, f_left) = evaluate_clamped(&self.function, &domain, &evaluation, left)?;
        let (right, f_right) = evaluate_clamped(&self.function, &domain, &evaluation, right)?;

        let span = &right - &left;
        let slope = quotient.divide(&(f_right - f_left), &span).ok_or_else(|| {
            EvaluationError::arithmetic(format!(
                "derivative at {input} has an empty span inside {domain}"
            ))
        })?;
        Ok(ctx.round(&slope))
    }

    fn domain(&self) -> Domain {
        self.function.domain()
    }
}
