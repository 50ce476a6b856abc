//! Scalar IoU kernel.

use crate::bbox::BBox;
use crate::kernel::OverlapKernel;

/// Reference IoU kernel, one box at a time.
pub struct IouScalar;

impl OverlapKernel for IouScalar {
    fn iou_row(query: &BBox, boxes: &[BBox], out: &mut [f32]) {
        debug_assert!(out.len() >= boxes.len());
        for (slot, other) in out.iter_mut().zip(boxes) {
            *slot = query.iou(other);
        }
    }
}
