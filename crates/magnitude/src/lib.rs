// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Magnitude Kernel
//!
//! Exact unsigned big integer arithmetic over arrays of 32-bit words, most
//! significant word first.
//!
//! ## Features
//!
//! - Addition, subtraction and multiplication on borrowed word slices, with windowed
//!   `(offset, len)` variants for combining sub-ranges without copying.
//! - Karatsuba multiplication above [`KARATSUBA_THRESHOLD`] words, schoolbook below.
//! - A canonical [`Magnitude`] value type convertible to and from `num-bigint`.
//! - Serialization: optional serde support for [`Magnitude`].
//!
//! Canonical form has no leading zero words and zero is the empty slice.
//! [`strip_leading_zeros`] hands back the input itself when it is already canonical.

pub mod errors;
pub mod kernel;
pub mod magnitude;
pub mod multiplication;

pub use errors::{MagnitudeError, MagnitudeResult};
pub use kernel::{
    add, add_window, compare, strip_leading_zeros, subtract, subtract_window, window,
};
pub use magnitude::Magnitude;
pub use multiplication::{
    karatsuba_multiply, multiply, multiply_window, schoolbook_multiply, KARATSUBA_THRESHOLD,
};
