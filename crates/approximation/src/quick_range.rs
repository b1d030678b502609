// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Best-effort bracket search.

use crate::context::PrecisionContext;
use crate::decimal::same_sign;
use crate::function::{evaluate_offset, MathFunction};
use crate::range::Range;
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use tracing::{debug, warn};

/// Expansion attempts, and again narrowing steps, made when no count is given.
pub const DEFAULT_TRIES: usize = 10;

/// Locates an interval around the point where a function reaches a target.
///
/// The search widens the starting range until the function crosses the target and
/// then bisects a few times. It gives no precision guarantee and never fails: on
/// exhausted tries or a failed evaluation it returns whatever range it holds, which
/// may not actually straddle the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickFindZeroRange;

impl QuickFindZeroRange {
    /// Searches from `[-1, 1]` with [`DEFAULT_TRIES`].
    pub fn find_range<F: MathFunction + ?Sized>(
        ctx: &PrecisionContext,
        function: &F,
        target: &BigDecimal,
    ) -> Range {
        Self::find_range_with(ctx, function, target, DEFAULT_TRIES, None)
    }

    pub fn find_range_with<F: MathFunction + ?Sized>(
        ctx: &PrecisionContext,
        function: &F,
        target: &BigDecimal,
        tries: usize,
        start_range: Option<&Range>,
    ) -> Range {
        let domain = function.domain();
        let start = start_range.cloned().unwrap_or_else(Range::unit);
        let (low, high) = start.clone().into_bounds();

        let Ok((mut x1, mut f1)) = evaluate_offset(function, &domain, ctx, target, low) else {
            return start;
        };
        let Ok((mut x2, mut f2)) = evaluate_offset(function, &domain, ctx, target, high) else {
            return Range::new(x1.clone(), x1);
        };

        let two = BigDecimal::from(2);
        let mut step = BigDecimal::one();
        let mut attempts = 0;
        while same_sign(&f1, &f2) && attempts < tries {
            attempts += 1;
            step = &step * &two;
            let lower = evaluate_offset(function, &domain, ctx, target, &x1 - &step);
            let upper = evaluate_offset(function, &domain, ctx, target, &x2 + &step);
            match (lower, upper) {
                (Ok((nx1, nf1)), Ok((nx2, nf2))) => {
                    x1 = nx1;
                    f1 = nf1;
                    x2 = nx2;
                    f2 = nf2;
                }
                _ => return Range::new(x1, x2),
            }
        }

        if same_sign(&f1, &f2) {
            warn!(range = %Range::new(x1.clone(), x2.clone()), tries, "no sign change found");
            return Range::new(x1, x2);
        }
        if f1.is_zero() {
            return Range::new(x1.clone(), x1);
        }
        if f2.is_zero() {
            return Range::new(x2.clone(), x2);
        }

        for _ in 0..tries {
            let mid = Range::new(x1.clone(), x2.clone()).midpoint();
            let Ok((x3, f3)) = evaluate_offset(function, &domain, ctx, target, mid) else {
                break;
            };
            if f3.is_zero() {
                return Range::new(x3.clone(), x3);
            }
            if same_sign(&f3, &f1) {
                x1 = x3;
                f1 = f3;
            } else {
                x2 = x3;
            }
        }

        let range = Range::new(x1, x2);
        debug!(%range, attempts, "bracket located");
        range
    }
}
