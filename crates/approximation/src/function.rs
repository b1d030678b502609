// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Function contract consumed by the approximation algorithms.

use crate::context::PrecisionContext;
use crate::errors::EvaluationError;
use bigdecimal::BigDecimal;
use std::fmt;
use std::sync::Arc;

/// A pure function evaluable at arbitrary decimal precision.
///
/// Implementations must be stateless: the same context and input always give the
/// same output. The declared [`domain`](Self::domain) is only used to clamp the
/// inputs an algorithm tries, never to reject them.
pub trait MathFunction {
    /// Evaluates the function at `input`, carrying `ctx.precision()` significant digits.
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError>;

    /// Inclusive bounds of the function's domain. Unbounded by default.
    fn domain(&self) -> Domain {
        Domain::unbounded()
    }
}

impl<T: MathFunction + ?Sized> MathFunction for &T {
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        (**self).calculate(ctx, input)
    }

    fn domain(&self) -> Domain {
        (**self).domain()
    }
}

impl<T: MathFunction + ?Sized> MathFunction for Box<T> {
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        (**self).calculate(ctx, input)
    }

    fn domain(&self) -> Domain {
        (**self).domain()
    }
}

impl<T: MathFunction + ?Sized> MathFunction for Arc<T> {
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        (**self).calculate(ctx, input)
    }

    fn domain(&self) -> Domain {
        (**self).domain()
    }
}

/// Optional inclusive lower and upper bounds. `None` means unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domain {
    lower: Option<BigDecimal>,
    upper: Option<BigDecimal>,
}

impl Domain {
    pub fn new(lower: Option<BigDecimal>, upper: Option<BigDecimal>) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn lower_bound(&self) -> Option<&BigDecimal> {
        self.lower.as_ref()
    }

    pub fn upper_bound(&self) -> Option<&BigDecimal> {
        self.upper.as_ref()
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Moves `x` onto the nearest bound if it lies outside the domain.
    ///
    /// The lower bound is applied first, so an inverted domain clamps to its upper bound.
    pub fn clamp(&self, x: BigDecimal) -> BigDecimal {
        let x = match &self.lower {
            Some(lower) if &x < lower => lower.clone(),
            _ => x,
        };
        match &self.upper {
            Some(upper) if &x > upper => upper.clone(),
            _ => x,
        }
    }

    pub fn contains(&self, x: &BigDecimal) -> bool {
        self.lower.as_ref().map_or(true, |lower| x >= lower)
            && self.upper.as_ref().map_or(true, |upper| x <= upper)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Some(lower) => write!(f, "[{lower}, ")?,
            None => write!(f, "(-inf, ")?,
        }
        match &self.upper {
            Some(upper) => write!(f, "{upper}]"),
            None => write!(f, "+inf)"),
        }
    }
}

/// Attaches declared bounds to a function.
#[derive(Debug, Clone)]
pub struct BoundedMathFunction<F> {
    function: F,
    domain: Domain,
}

impl<F: MathFunction> BoundedMathFunction<F> {
    pub fn new(
        function: F,
        lower_bound: Option<BigDecimal>,
        upper_bound: Option<BigDecimal>,
    ) -> Self {
        Self {
            function,
            domain: Domain::new(lower_bound, upper_bound),
        }
    }

    pub fn lower_bound(&self) -> Option<&BigDecimal> {
        self.domain.lower_bound()
    }

    pub fn upper_bound(&self) -> Option<&BigDecimal> {
        self.domain.upper_bound()
    }

    pub fn inner(&self) -> &F {
        &self.function
    }
}

impl<F: MathFunction> MathFunction for BoundedMathFunction<F> {
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        self.function.calculate(ctx, input)
    }

    fn domain(&self) -> Domain {
        self.domain.clone()
    }
}

/// A [`MathFunction`] backed by a closure. Built with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnFunction<F> {
    f: F,
}

/// Wraps a closure as an unbounded [`MathFunction`].
///
/// ```
/// use arbprec_approximation::{from_fn, MathFunction, PrecisionContext};
/// use bigdecimal::BigDecimal;
///
/// let square = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| Ok(ctx.multiply(x, x)));
/// let ctx = PrecisionContext::new(10);
/// assert_eq!(square.calculate(&ctx, &BigDecimal::from(3)).unwrap(), BigDecimal::from(9));
/// ```
pub fn from_fn<F>(f: F) -> FnFunction<F>
where
    F: Fn(&PrecisionContext, &BigDecimal) -> Result<BigDecimal, EvaluationError>,
{
    FnFunction { f }
}

impl<F> MathFunction for FnFunction<F>
where
    F: Fn(&PrecisionContext, &BigDecimal) -> Result<BigDecimal, EvaluationError>,
{
    fn calculate(
        &self,
        ctx: &PrecisionContext,
        input: &BigDecimal,
    ) -> Result<BigDecimal, EvaluationError> {
        (self.f)(ctx, input)
    }
}

impl<F> fmt::Debug for FnFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFunction").finish_non_exhaustive()
    }
}

/// Clamps `candidate` into `domain`, rounds it to `ctx`, and evaluates there.
///
/// Returns the input actually used together with the rounded function value.
/// Every algorithm goes through this helper so all of them clamp the same way.
pub(crate) fn evaluate_clamped<F: MathFunction + ?Sized>(
    function: &F,
    domain: &Domain,
    ctx: &PrecisionContext,
    candidate: BigDecimal,
) -> Result<(BigDecimal, BigDecimal), EvaluationError> {
    let input = ctx.round(&domain.clamp(candidate));
    let value = ctx.round(&function.calculate(ctx, &input)?);
    Ok((input, value))
}

/// Like [`evaluate_clamped`] but returns `f(x) - target`.
pub(crate) fn evaluate_offset<F: MathFunction + ?Sized>(
    function: &F,
    domain: &Domain,
    ctx: &PrecisionContext,
    target: &BigDecimal,
    candidate: BigDecimal,
) -> Result<(BigDecimal, BigDecimal), EvaluationError> {
    let (input, value) = evaluate_clamped(function, domain, ctx, candidate)?;
    let offset = ctx.round(&(value - target));
    Ok((input, offset))
}
