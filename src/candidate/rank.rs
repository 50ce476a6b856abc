//! Score ranking and budget truncation.

use crate::util::math::score_cmp_desc;

/// Returns the permutation that sorts `scores` descending.
///
/// The sort is stable: equal scores keep ascending original index, and NaN
/// scores go last.
pub fn rank_desc(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| score_cmp_desc(scores[a], scores[b]));
    order
}

/// Truncates `items` to `budget` entries; a budget of 0 keeps everything.
pub fn truncate_budget<T>(items: &mut Vec<T>, budget: usize) {
    if budget > 0 && items.len() > budget {
        items.truncate(budget);
    }
}
