//! Anchor-relative box regression.
//!
//! `encode` produces the training-time regression target of a box relative to
//! an anchor; `decode` inverts it. Both operate in `f32`, the precision of the
//! predictions, and use the exact exponential so decoded sizes match the
//! encoding used to train the predictor.

use crate::bbox::{BBox, BoxDelta};
use crate::util::{ProposalError, ProposalResult};

/// Applies a delta to a single anchor.
///
/// Total over real inputs; the result may be inverted or non-finite.
#[inline]
pub fn decode_one(anchor: &BBox, delta: &BoxDelta) -> BBox {
    let w_a = anchor.width();
    let h_a = anchor.height();
    let (cx_a, cy_a) = anchor.center();

    let cx = delta.dx * w_a + cx_a;
    let cy = delta.dy * h_a + cy_a;
    let w = delta.dw.exp() * w_a;
    let h = delta.dh.exp() * h_a;

    BBox {
        x1: cx - 0.5 * w,
        y1: cy - 0.5 * h,
        x2: cx + 0.5 * w,
        y2: cy + 0.5 * h,
    }
}

/// Decodes co-indexed anchors and deltas into absolute boxes.
pub fn decode(anchors: &[BBox], deltas: &[BoxDelta]) -> ProposalResult<Vec<BBox>> {
    if anchors.len() != deltas.len() {
        return Err(ProposalError::ShapeMismatch {
            expected: anchors.len(),
            got: deltas.len(),
            context: "delta count",
        });
    }
    Ok(anchors
        .iter()
        .zip(deltas)
        .map(|(anchor, delta)| decode_one(anchor, delta))
        .collect())
}

/// Computes the regression target that moves `source` onto `target`.
///
/// Both boxes need positive width and height for the result to be finite.
pub fn encode(source: &BBox, target: &BBox) -> BoxDelta {
    let w_s = source.width();
    let h_s = source.height();
    let (cx_s, cy_s) = source.center();
    let (cx_t, cy_t) = target.center();

    BoxDelta {
        dx: (cx_t - cx_s) / w_s,
        dy: (cy_t - cy_s) / h_s,
        dw: (target.width() / w_s).ln(),
        dh: (target.height() / h_s).ln(),
    }
}
