// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for function evaluation and approximation.
//!
//! Three kinds of failure are kept apart:
//!
//! - [`ApproximationError::NoConvergence`]: the iteration budget ran out, or the
//!   iteration hit a zero derivative. A legitimate numerical outcome.
//! - [`ApproximationError::ZeroDenominator`]: a precondition of the algorithm broke.
//! - [`ApproximationError::Evaluation`]: the caller's function failed and the error is
//!   passed through untouched.

use thiserror::Error;

/// Errors a [`MathFunction`](crate::MathFunction) may return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The input or a computed value is not a representable number
    #[error("Number format error: {message}")]
    NumberFormat { message: String },

    /// Arithmetic failure such as a division by zero
    #[error("Arithmetic error: {message}")]
    Arithmetic { message: String },

    /// The input lies outside the function's domain
    #[error("Domain error: {message}")]
    Domain { message: String },
}

impl EvaluationError {
    pub fn number_format(message: impl Into<String>) -> Self {
        EvaluationError::NumberFormat {
            message: message.into(),
        }
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        EvaluationError::Arithmetic {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        EvaluationError::Domain {
            message: message.into(),
        }
    }
}

/// Why an approximation stopped without an answer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceFailure {
    #[error("iteration limit reached")]
    IterationsExhausted,

    #[error("no sign change found while expanding the search range")]
    BracketNotFound,

    #[error("derivative is zero")]
    ZeroDerivative,

    #[error("function evaluation failed")]
    EvaluationFailed,
}

/// Errors returned by the approximation algorithms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApproximationError {
    /// No value satisfying the convergence test was found
    #[error("{algorithm} did not converge after {iterations} iterations: {reason}")]
    NoConvergence {
        algorithm: &'static str,
        iterations: usize,
        reason: ConvergenceFailure,
    },

    /// A divisor computed from function values was exactly zero
    #[error("{algorithm} hit a zero denominator after {iterations} iterations")]
    ZeroDenominator {
        algorithm: &'static str,
        iterations: usize,
    },

    /// The target function failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Result type alias for approximation operations
pub type ApproximationResult<T> = Result<T, ApproximationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_convergence_message() {
        let err = ApproximationError::NoConvergence {
            algorithm: "bisection",
            iterations: 12,
            reason: ConvergenceFailure::IterationsExhausted,
        };
        assert_eq!(
            err.to_string(),
            "bisection did not converge after 12 iterations: iteration limit reached"
        );
    }

    #[test]
    fn test_evaluation_error_is_transparent() {
        let err: ApproximationError = EvaluationError::number_format("NaN").into();
        assert_eq!(err.to_string(), "Number format error: NaN");
    }
}
