// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Canonical magnitude value type built on the word-slice kernel.

use crate::errors::MagnitudeResult;
use crate::kernel::{self, strip_owned};
use crate::multiplication::multiply;
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unsigned big integer stored as 32-bit words, most significant first.
///
/// The words never carry a leading zero; zero is the empty sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Magnitude {
    words: Vec<u32>,
}

impl Magnitude {
    /// Creates a magnitude from words in most-significant-first order.
    ///
    /// Leading zero words are dropped.
    pub fn from_words(words: Vec<u32>) -> Self {
        Self {
            words: strip_owned(words),
        }
    }

    /// Returns the zero magnitude.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns the canonical words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of words in the canonical form.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    /// Subtracts `other` from `self`.
    ///
    /// # Errors
    ///
    /// Returns `MagnitudeError::Underflow` if `other > self`.
    pub fn checked_sub(&self, other: &Self) -> MagnitudeResult<Self> {
        kernel::subtract(&self.words, &other.words).map(|words| Self { words })
    }

    pub fn to_biguint(&self) -> BigUint {
        let mut digits = self.words.clone();
        digits.reverse();
        BigUint::new(digits)
    }
}

impl From<&BigUint> for Magnitude {
    fn from(value: &BigUint) -> Self {
        let mut words = value.to_u32_digits();
        words.reverse();
        Self::from_words(words)
    }
}

impl From<u64> for Magnitude {
    fn from(value: u64) -> Self {
        Self::from_words(vec![(value >> 32) as u32, value as u32])
    }
}

impl From<Magnitude> for BigUint {
    fn from(value: Magnitude) -> Self {
        value.to_biguint()
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words
            .len()
            .cmp(&other.words.len())
            .then_with(|| self.words.cmp(&other.words))
    }
}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &Magnitude {
    type Output = Magnitude;

    fn add(self, rhs: Self) -> Magnitude {
        Magnitude::from_words(kernel::add(&self.words, &rhs.words))
    }
}

impl Mul for &Magnitude {
    type Output = Magnitude;

    fn mul(self, rhs: Self) -> Magnitude {
        Magnitude {
            words: multiply(&self.words, &rhs.words),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}
