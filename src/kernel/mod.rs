//! Overlap kernel implementations.
//!
//! A kernel computes one row of the IoU matrix: the overlap of a query box
//! against a run of other boxes. Greedy suppression is built on top of these
//! rows, so every kernel must produce bit-identical values to the scalar one
//! for the kept set to be independent of the code path.

use crate::bbox::BBox;

/// Kernel trait for IoU row evaluation.
pub trait OverlapKernel {
    /// Writes `query.iou(&boxes[j])` into `out[j]` for every `j`.
    ///
    /// `out` must be at least as long as `boxes`.
    fn iou_row(query: &BBox, boxes: &[BBox], out: &mut [f32]);

    /// Returns true when any box overlaps `query` at or above `threshold`.
    fn any_at_least(query: &BBox, boxes: &[BBox], threshold: f32, scratch: &mut Vec<f32>) -> bool {
        scratch.clear();
        scratch.resize(boxes.len(), 0.0);
        Self::iou_row(query, boxes, scratch);
        scratch.iter().any(|&v| v >= threshold)
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Kernel used by the suppressor: SIMD rows when available.
#[cfg(not(feature = "simd"))]
pub type DefaultKernel = scalar::IouScalar;
/// Kernel used by the suppressor: SIMD rows when available.
#[cfg(feature = "simd")]
pub type DefaultKernel = simd::IouSimd;
