//! Numeric helpers shared by ranking and suppression.

use std::cmp::Ordering;

/// Orders scores descending with NaN after every other value.
pub(crate) fn score_cmp_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Multiplies dimensions, returning `None` on overflow.
pub(crate) fn checked_volume(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}
