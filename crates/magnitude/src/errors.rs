// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for magnitude arithmetic.

use thiserror::Error;

/// Contract violations raised by the magnitude kernel.
///
/// Neither variant is recoverable: both mean the caller broke a precondition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MagnitudeError {
    /// The subtrahend was larger than the minuend.
    #[error("underflow: subtrahend exceeds minuend")]
    Underflow,

    /// A windowed operand reached past the end of its word slice.
    #[error("invalid window: offset {offset} + len {len} exceeds {available} words")]
    InvalidWindow {
        offset: usize,
        len: usize,
        available: usize,
    },
}

/// Result type alias for magnitude operations
pub type MagnitudeResult<T> = Result<T, MagnitudeError>;
