// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Addition, subtraction and canonicalization over magnitude word slices.
//!
//! Every slice is read most-significant word first. Windowed variants take an
//! `(offset, len)` pair per operand and resolve it to a sub-slice, so parts of a
//! larger magnitude can be combined without copying.

use crate::errors::{MagnitudeError, MagnitudeResult};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Mask selecting the low 32 bits of a 64-bit accumulator.
pub(crate) const LONG_MASK: u64 = 0xffff_ffff;

/// Resolves `(offset, len)` against `words`.
///
/// # Errors
///
/// Returns `MagnitudeError::InvalidWindow` if the window does not fit inside `words`.
pub fn window(words: &[u32], offset: usize, len: usize) -> MagnitudeResult<&[u32]> {
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= words.len())
        .ok_or(MagnitudeError::InvalidWindow {
            offset,
            len,
            available: words.len(),
        })?;
    Ok(&words[offset..end])
}

/// Returns the canonical form of `x`.
///
/// When `x` has no leading zero words the very same slice is handed back as
/// `Cow::Borrowed`; otherwise a freshly allocated canonical copy is returned.
/// Zero canonicalizes to the empty slice.
pub fn strip_leading_zeros(x: &[u32]) -> Cow<'_, [u32]> {
    match x.iter().position(|&w| w != 0) {
        Some(0) => Cow::Borrowed(x),
        Some(first) => Cow::Owned(x[first..].to_vec()),
        None if x.is_empty() => Cow::Borrowed(x),
        None => Cow::Owned(Vec::new()),
    }
}

/// Strips leading zero words from an owned vector in place.
pub(crate) fn strip_owned(mut x: Vec<u32>) -> Vec<u32> {
    let leading = x.iter().take_while(|&&w| w == 0).count();
    if leading > 0 {
        x.drain(..leading);
    }
    x
}

/// Compares two magnitudes by value, ignoring leading zero words.
pub fn compare(x: &[u32], y: &[u32]) -> Ordering {
    let x = strip_leading_zeros(x);
    let y = strip_leading_zeros(y);
    x.len().cmp(&y.len()).then_with(|| x.as_ref().cmp(y.as_ref()))
}

/// Adds two magnitudes.
///
/// The result is as long as the longer operand, plus one leading word when a
/// final carry propagates out. Leading zeros of the operands are kept; stripping
/// them is the caller's job.
pub fn add(x: &[u32], y: &[u32]) -> Vec<u32> {
    // Treat the longer operand as x.
    let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };

    let mut result = x.to_vec();
    let mut carry = 0u64;
    let mut xi = x.len();
    let mut yi = y.len();

    while yi > 0 {
        xi -= 1;
        yi -= 1;
        let sum = u64::from(x[xi]) + u64::from(y[yi]) + carry;
        result[xi] = (sum & LONG_MASK) as u32;
        carry = sum >> 32;
    }

    while carry != 0 && xi > 0 {
        xi -= 1;
        let sum = u64::from(x[xi]) + carry;
        result[xi] = (sum & LONG_MASK) as u32;
        carry = sum >> 32;
    }

    if carry != 0 {
        result.insert(0, carry as u32);
    }
    result
}

/// Adds two windowed magnitudes. See [`add`].
///
/// # Errors
///
/// Returns `MagnitudeError::InvalidWindow` if either window is malformed.
pub fn add_window(
    x: &[u32],
    xoff: usize,
    xlen: usize,
    y: &[u32],
    yoff: usize,
    ylen: usize,
) -> MagnitudeResult<Vec<u32>> {
    Ok(add(window(x, xoff, xlen)?, window(y, yoff, ylen)?))
}

/// Subtracts `y` from `x`.
///
/// The result is always leading-zero-stripped.
///
/// # Errors
///
/// Returns `MagnitudeError::Underflow` if `y > x`.
pub fn subtract(x: &[u32], y: &[u32]) -> MagnitudeResult<Vec<u32>> {
    let x = strip_leading_zeros(x);
    let y = strip_leading_zeros(y);
    if compare(&x, &y) == Ordering::Less {
        return Err(MagnitudeError::Underflow);
    }

    let mut result = x.into_owned();
    let mut borrow = 0i64;
    let mut xi = result.len();
    let mut yi = y.len();

    while yi > 0 {
        xi -= 1;
        yi -= 1;
        let mut diff = i64::from(result[xi]) - i64::from(y[yi]) - borrow;
        borrow = i64::from(diff < 0);
        if diff < 0 {
            diff += 1 << 32;
        }
        result[xi] = diff as u32;
    }

    while borrow != 0 && xi > 0 {
        xi -= 1;
        let diff = i64::from(result[xi]) - borrow;
        borrow = i64::from(diff < 0);
        result[xi] = if diff < 0 {
            (diff + (1 << 32)) as u32
        } else {
            diff as u32
        };
    }

    Ok(strip_owned(result))
}

/// Subtracts a windowed `y` from a windowed `x`. See [`subtract`].
///
/// # Errors
///
/// Returns `MagnitudeError::InvalidWindow` for a malformed window and
/// `MagnitudeError::Underflow` if `y > x`.
pub fn subtract_window(
    x: &[u32],
    xoff: usize,
    xlen: usize,
    y: &[u32],
    yoff: usize,
    ylen: usize,
) -> MagnitudeResult<Vec<u32>> {
    subtract(window(x, xoff, xlen)?, window(y, yoff, ylen)?)
}
