//! SIMD IoU kernel using the `wide` crate.
//!
//! Boxes are gathered eight at a time into structure-of-arrays lanes and the
//! IoU is evaluated with `f32x8`. The lane arithmetic follows the same
//! operation order as `BBox::iou`, so results match the scalar kernel.

use crate::bbox::BBox;
use crate::kernel::OverlapKernel;
use wide::f32x8;

const LANES: usize = 8;

/// Corner lanes for eight boxes.
struct BoxLanes {
    x1: f32x8,
    y1: f32x8,
    x2: f32x8,
    y2: f32x8,
}

#[inline]
fn gather(chunk: &[BBox]) -> BoxLanes {
    let mut x1 = [0.0f32; LANES];
    let mut y1 = [0.0f32; LANES];
    let mut x2 = [0.0f32; LANES];
    let mut y2 = [0.0f32; LANES];
    for (lane, b) in chunk.iter().enumerate().take(LANES) {
        x1[lane] = b.x1;
        y1[lane] = b.y1;
        x2[lane] = b.x2;
        y2[lane] = b.y2;
    }
    BoxLanes {
        x1: f32x8::from(x1),
        y1: f32x8::from(y1),
        x2: f32x8::from(x2),
        y2: f32x8::from(y2),
    }
}

/// SIMD-accelerated IoU row kernel.
pub struct IouSimd;

impl OverlapKernel for IouSimd {
    fn iou_row(query: &BBox, boxes: &[BBox], out: &mut [f32]) {
        debug_assert!(out.len() >= boxes.len());
        let zero = f32x8::ZERO;
        let qx1 = f32x8::splat(query.x1);
        let qy1 = f32x8::splat(query.y1);
        let qx2 = f32x8::splat(query.x2);
        let qy2 = f32x8::splat(query.y2);
        let q_area = f32x8::splat(query.area());

        let simd_end = boxes.len() / LANES * LANES;
        let mut start = 0;
        while start < simd_end {
            let lanes = gather(&boxes[start..start + LANES]);

            let iw = (qx2.min(lanes.x2) - qx1.max(lanes.x1)).max(zero);
            let ih = (qy2.min(lanes.y2) - qy1.max(lanes.y1)).max(zero);
            let inter = iw * ih;
            let area = (lanes.x2 - lanes.x1).max(zero) * (lanes.y2 - lanes.y1).max(zero);
            let union = q_area + area - inter;
            let iou = union.simd_gt(zero).blend(inter / union, zero);

            out[start..start + LANES].copy_from_slice(&iou.to_array());
            start += LANES;
        }

        // Scalar remainder
        for (slot, other) in out[simd_end..].iter_mut().zip(&boxes[simd_end..]) {
            *slot = query.iou(other);
        }
    }
}
