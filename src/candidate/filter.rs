//! Clipping, size filtering and pre-suppression ranking of decoded boxes.
//!
//! The steps run in a fixed order: clip first, then measure. A box that was
//! large enough before clipping but shrinks below the minimum side once it is
//! clamped to the image is discarded.

use crate::bbox::{BBox, ImageSize};
use crate::candidate::rank::{rank_desc, truncate_budget};
use crate::trace::trace_event;
use crate::util::{ProposalError, ProposalResult};

/// Clips every box to the image in place.
pub fn clip_boxes(boxes: &mut [BBox], size: ImageSize) {
    for b in boxes.iter_mut() {
        *b = b.clip(size);
    }
}

/// Returns indices of boxes whose width and height are both `>= min_side`.
///
/// Inverted boxes have negative extent and fail the check, as do boxes with
/// NaN coordinates.
pub fn size_filter(boxes: &[BBox], min_side: f32) -> Vec<usize> {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| b.width() >= min_side && b.height() >= min_side)
        .map(|(idx, _)| idx)
        .collect()
}

/// Clips, size-filters, ranks by score and truncates to `pre_budget`.
///
/// Returns the surviving boxes and their scores in score-descending order.
/// `pre_budget == 0` disables truncation.
pub fn filter_and_rank(
    mut boxes: Vec<BBox>,
    scores: &[f32],
    size: ImageSize,
    min_side: f32,
    pre_budget: usize,
) -> ProposalResult<(Vec<BBox>, Vec<f32>)> {
    if boxes.len() != scores.len() {
        return Err(ProposalError::ShapeMismatch {
            expected: boxes.len(),
            got: scores.len(),
            context: "score count",
        });
    }

    clip_boxes(&mut boxes, size);
    let keep = size_filter(&boxes, min_side);
    trace_event!("size_filter", kept = keep.len(), dropped = boxes.len() - keep.len());

    let kept_scores: Vec<f32> = keep.iter().map(|&i| scores[i]).collect();
    let mut order = rank_desc(&kept_scores);
    truncate_budget(&mut order, pre_budget);

    let ranked_boxes = order.iter().map(|&o| boxes[keep[o]]).collect();
    let ranked_scores = order.iter().map(|&o| kept_scores[o]).collect();
    Ok((ranked_boxes, ranked_scores))
}
