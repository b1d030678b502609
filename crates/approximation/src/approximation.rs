// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::PrecisionContext;
use crate::errors::ApproximationResult;
use crate::range::{ApproximatedResult, Range};
use bigdecimal::BigDecimal;

/// Finds an input at which a bound function reaches `target`.
///
/// Implementations hold only immutable configuration, so one instance can serve any
/// number of concurrent calls. With no `search_range` the search starts from
/// `[-1, 1]` and expands.
pub trait Approximation {
    fn approximate(
        &self,
        ctx: &PrecisionContext,
        target: &BigDecimal,
        search_range: Option<&Range>,
    ) -> ApproximationResult<ApproximatedResult>;
}
