//! Greedy IoU non-maximum suppression.
//!
//! The greedy rule: repeatedly take the highest-scoring remaining box and
//! discard every other box overlapping it with IoU `>= iou_threshold`. Kept
//! indices come back in descending score order, ties broken by lower index.

use crate::bbox::BBox;
use crate::candidate::rank::rank_desc;
use crate::kernel::{DefaultKernel, OverlapKernel};
use crate::util::{ProposalError, ProposalResult};

/// Overlap-based deduplication of scored boxes.
///
/// `use_accelerated` selects a code path and never changes the kept set.
pub trait Suppressor: Send + Sync {
    /// Returns indices into `boxes` that survive suppression, best first.
    fn suppress(
        &self,
        boxes: &[BBox],
        scores: &[f32],
        iou_threshold: f32,
        use_accelerated: bool,
    ) -> ProposalResult<Vec<usize>>;
}

/// CPU greedy suppressor with an optional parallel path.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyNms;

impl Suppressor for GreedyNms {
    fn suppress(
        &self,
        boxes: &[BBox],
        scores: &[f32],
        iou_threshold: f32,
        use_accelerated: bool,
    ) -> ProposalResult<Vec<usize>> {
        if use_accelerated {
            #[cfg(feature = "rayon")]
            return nms_greedy_par(boxes, scores, iou_threshold);
            #[cfg(not(feature = "rayon"))]
            return Err(ProposalError::AcceleratorUnavailable);
        }
        nms_greedy(boxes, scores, iou_threshold)
    }
}

fn check_lengths(boxes: &[BBox], scores: &[f32]) -> ProposalResult<()> {
    if boxes.len() != scores.len() {
        return Err(ProposalError::ShapeMismatch {
            expected: boxes.len(),
            got: scores.len(),
            context: "score count",
        });
    }
    Ok(())
}

/// Sequential greedy suppression.
///
/// Each candidate, in score order, is compared against the boxes kept so far.
pub fn nms_greedy(
    boxes: &[BBox],
    scores: &[f32],
    iou_threshold: f32,
) -> ProposalResult<Vec<usize>> {
    check_lengths(boxes, scores)?;

    let mut keep = Vec::new();
    let mut kept_boxes: Vec<BBox> = Vec::new();
    let mut scratch = Vec::new();
    for idx in rank_desc(scores) {
        let candidate = boxes[idx];
        if DefaultKernel::any_at_least(&candidate, &kept_boxes, iou_threshold, &mut scratch) {
            continue;
        }
        kept_boxes.push(candidate);
        keep.push(idx);
    }
    Ok(keep)
}

/// Parallel greedy suppression (rayon).
///
/// Builds the full suppression bitmask in parallel, then reduces it greedily.
/// Produces the same kept set as [`nms_greedy`]. The mask takes
/// `n * ceil(n / 64)` words, which is only practical with a bounded `n`.
#[cfg(feature = "rayon")]
pub fn nms_greedy_par(
    boxes: &[BBox],
    scores: &[f32],
    iou_threshold: f32,
) -> ProposalResult<Vec<usize>> {
    use crate::kernel::rayon::{mask_row_blocks, suppression_mask_par, MASK_BLOCK};

    check_lengths(boxes, scores)?;

    let order = rank_desc(scores);
    let sorted: Vec<BBox> = order.iter().map(|&i| boxes[i]).collect();
    let mask = suppression_mask_par(&sorted, iou_threshold);
    let blocks = mask_row_blocks(sorted.len());

    let mut removed = vec![0u64; blocks];
    let mut keep = Vec::new();
    for (pos, &idx) in order.iter().enumerate() {
        if removed[pos / MASK_BLOCK] & (1u64 << (pos % MASK_BLOCK)) != 0 {
            continue;
        }
        keep.push(idx);
        let row = &mask[pos * blocks..(pos + 1) * blocks];
        for (acc, bits) in removed.iter_mut().zip(row) {
            *acc |= bits;
        }
    }
    Ok(keep)
}
