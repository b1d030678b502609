// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Approximation Library
//!
//! Iterative root finding over functions evaluated to arbitrary decimal precision.
//!
//! ## Features
//!
//! - [`BiSectionApproximation`]: bracket expansion followed by bisection, with an
//!   optional best-effort mode.
//! - [`NewtonRhapsonApproximation`]: Newton-Raphson with a supplied or numeric derivative.
//! - [`RegulaFalsiApproximation`]: false position, plain or Pegasus-damped.
//! - [`QuickFindZeroRange`]: a cheap bracket search that never fails.
//! - [`DerivateNumericalApproximation`]: a numeric first derivative that is itself a
//!   [`MathFunction`].
//! - Layered configuration through [`load_config`].
//!
//! Every algorithm clamps the inputs it tries to the function's declared [`Domain`],
//! works at a few guard digits beyond the caller's [`PrecisionContext`] and rounds its
//! answer back to it. Algorithms hold only immutable settings and can be shared by
//! reference across threads.
//!
//! ```
//! use arbprec_approximation::{
//!     from_fn, Approximation, BiSectionApproximation, PrecisionContext, Range,
//! };
//! use bigdecimal::BigDecimal;
//!
//! let square = from_fn(|ctx: &PrecisionContext, x: &BigDecimal| Ok(ctx.multiply(x, x)));
//! let ctx = PrecisionContext::new(30);
//! let range = Range::new(BigDecimal::from(0), BigDecimal::from(10));
//! let result = BiSectionApproximation::new(square)
//!     .with_accuracy(25)
//!     .approximate(&ctx, &BigDecimal::from(4), Some(&range))
//!     .unwrap();
//! assert!((result.approximated_value() - BigDecimal::from(2)).abs() < BigDecimal::from(1));
//! ```

pub mod approximation;
pub mod bisection;
pub mod config;
pub mod context;
pub mod decimal;
pub mod derivative;
pub mod errors;
pub mod function;
pub mod newton;
pub mod quick_range;
pub mod range;
pub mod regula_falsi;

pub use approximation::Approximation;
pub use bisection::BiSectionApproximation;
pub use config::{
    load_config, ApproximationConfig, BisectionConfig, ConfigError, NewtonConfig,
    QuickRangeConfig, RegulaFalsiConfig,
};
pub use context::{PrecisionContext, Rounding, DEFAULT_PRECISION};
pub use decimal::{ten_pow_neg, to_decimal, ToDecimal};
pub use derivative::DerivateNumericalApproximation;
pub use errors::{ApproximationError, ApproximationResult, ConvergenceFailure, EvaluationError};
pub use function::{from_fn, BoundedMathFunction, Domain, FnFunction, MathFunction};
pub use newton::NewtonRhapsonApproximation;
pub use quick_range::QuickFindZeroRange;
pub use range::{ApproximatedResult, Range};
pub use regula_falsi::RegulaFalsiApproximation;
