// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Magnitude multiplication: schoolbook and Karatsuba.

use crate::errors::MagnitudeResult;
use crate::kernel::{add, strip_leading_zeros, strip_owned, subtract, window, LONG_MASK};

/// Operand length, in words, above which multiplication switches to Karatsuba.
///
/// Both operands must exceed it. Below this size the recursion overhead costs more
/// than the schoolbook inner loop saves.
pub const KARATSUBA_THRESHOLD: usize = 40;

/// Multiplies two magnitudes, dispatching on operand length.
///
/// The result is always leading-zero-stripped.
pub fn multiply(x: &[u32], y: &[u32]) -> Vec<u32> {
    if x.len() > KARATSUBA_THRESHOLD && y.len() > KARATSUBA_THRESHOLD {
        karatsuba_multiply(x, y)
    } else {
        schoolbook_multiply(x, y)
    }
}

/// Multiplies two windowed magnitudes. See [`multiply`].
///
/// # Errors
///
/// Returns `MagnitudeError::InvalidWindow` if either window is malformed.
pub fn multiply_window(
    x: &[u32],
    xoff: usize,
    xlen: usize,
    y: &[u32],
    yoff: usize,
    ylen: usize,
) -> MagnitudeResult<Vec<u32>> {
    Ok(multiply(window(x, xoff, xlen)?, window(y, yoff, ylen)?))
}

/// O(n·m) multiplication.
///
/// Each output word is accumulated in a 64-bit running product: a word product plus
/// the previous partial word plus the carry never exceeds `u64::MAX`.
pub fn schoolbook_multiply(x: &[u32], y: &[u32]) -> Vec<u32> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }

    let mut z = vec![0u32; x.len() + y.len()];
    for i in (0..x.len()).rev() {
        let xi = u64::from(x[i]);
        let mut carry = 0u64;
        for j in (0..y.len()).rev() {
            let k = i + j + 1;
            let product = xi * u64::from(y[j]) + u64::from(z[k]) + carry;
            z[k] = (product & LONG_MASK) as u32;
            carry = product >> 32;
        }
        z[i] = carry as u32;
    }
    strip_owned(z)
}

/// Karatsuba multiplication.
///
/// Splits both operands at `half = max_len >> 1` words from the least significant
/// end into `a1:a0` and `b1:b0` and combines
/// `a1*b1 << 2half + ((a0+a1)(b0+b1) - a1*b1 - a0*b0) << half + a0*b0`.
/// Sub-products go back through [`multiply`], so recursion stops at the threshold.
pub fn karatsuba_multiply(x: &[u32], y: &[u32]) -> Vec<u32> {
    let x = strip_leading_zeros(x);
    let y = strip_leading_zeros(y);
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }
    let half = x.len().max(y.len()) >> 1;
    if half == 0 {
        return schoolbook_multiply(&x, &y);
    }

    let (a1, a0) = split(&x, half);
    let (b1, b0) = split(&y, half);

    let p0 = multiply(a0, b0);
    let p2 = multiply(a1, b1);
    let p1 = multiply(&add(a0, a1), &add(b0, b1));

    // (a0+a1)(b0+b1) >= a1*b1 + a0*b0, so neither subtraction can underflow.
    let middle = subtract(&p1, &p2).and_then(|partial| subtract(&partial, &p0));
    debug_assert!(middle.is_ok(), "karatsuba middle term underflowed");
    let middle = middle.unwrap_or_default();

    let high = shift_words(p2, 2 * half);
    let middle = shift_words(middle, half);
    strip_owned(add(&add(&high, &middle), &p0))
}

/// Splits `x` into `(upper, lower)` where `lower` holds the `half` least significant words.
fn split(x: &[u32], half: usize) -> (&[u32], &[u32]) {
    if x.len() <= half {
        (&x[..0], x)
    } else {
        x.split_at(x.len() - half)
    }
}

/// Multiplies by `2^(32 * words)` by appending zero words.
fn shift_words(mut x: Vec<u32>, words: usize) -> Vec<u32> {
    if !x.is_empty() {
        x.resize(x.len() + words, 0);
    }
    x
}
