//! Rayon-parallel suppression mask (feature-gated).
//!
//! The accelerated suppressor splits greedy NMS into two phases. The
//! expensive phase computes, for every box `i` of a score-sorted list, a bit
//! row marking the later boxes `j > i` that `i` would suppress. Rows are
//! independent and are filled in parallel. The cheap greedy reduction over
//! the rows is sequential and lives with the suppressor.

use crate::bbox::BBox;
use crate::kernel::{DefaultKernel, OverlapKernel};
use rayon::prelude::*;

/// Bits per mask block.
pub const MASK_BLOCK: usize = 64;

/// Number of `u64` blocks in one mask row for `n` boxes.
pub fn mask_row_blocks(n: usize) -> usize {
    n.div_ceil(MASK_BLOCK)
}

/// Builds the row-major suppression mask for score-sorted boxes.
///
/// Bit `j` of row `i` is set iff `j > i` and
/// `sorted[i].iou(&sorted[j]) >= iou_threshold`. The result has
/// `n * mask_row_blocks(n)` blocks, so memory grows quadratically: about
/// 1.25 GB for 100k boxes. Keep a pre-suppression budget when using it.
pub fn suppression_mask_par(sorted: &[BBox], iou_threshold: f32) -> Vec<u64> {
    let n = sorted.len();
    let blocks = mask_row_blocks(n);
    let mut mask = vec![0u64; n * blocks];
    if n == 0 {
        return mask;
    }

    mask.par_chunks_mut(blocks).enumerate().for_each_init(
        Vec::new,
        |scratch: &mut Vec<f32>, (i, row)| {
            let rest = &sorted[i + 1..];
            scratch.clear();
            scratch.resize(rest.len(), 0.0);
            DefaultKernel::iou_row(&sorted[i], rest, scratch);
            for (offset, &iou) in scratch.iter().enumerate() {
                if iou >= iou_threshold {
                    let j = i + 1 + offset;
                    row[j / MASK_BLOCK] |= 1u64 << (j % MASK_BLOCK);
                }
            }
        },
    );

    mask
}

#[cfg(test)]
mod tests {
    use super::{mask_row_blocks, suppression_mask_par};
    use crate::bbox::BBox;

    #[test]
    fn mask_marks_only_later_overlapping_boxes() {
        let sorted = [
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(1.0, 1.0, 10.0, 10.0),
            BBox::new(50.0, 50.0, 60.0, 60.0),
        ];
        let mask = suppression_mask_par(&sorted, 0.5);
        assert_eq!(mask_row_blocks(3), 1);
        assert_eq!(mask, vec![0b010, 0b000, 0b000]);
    }

    #[test]
    fn rows_span_multiple_blocks() {
        let sorted = vec![BBox::new(0.0, 0.0, 10.0, 10.0); 70];
        let mask = suppression_mask_par(&sorted, 0.9);
        let blocks = mask_row_blocks(70);
        assert_eq!(blocks, 2);
        assert_eq!(mask.len(), 70 * blocks);
        // Row 0 suppresses boxes 1..70.
        assert_eq!(mask[0], !1u64);
        assert_eq!(mask[1], (1u64 << 6) - 1);
        // Last row suppresses nothing.
        assert_eq!(mask[69 * blocks], 0);
        assert_eq!(mask[69 * blocks + 1], 0);
    }

    #[test]
    fn empty_input_gives_empty_mask() {
        assert!(suppression_mask_par(&[], 0.5).is_empty());
    }
}
