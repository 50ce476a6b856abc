//! Realignment of channel-major prediction maps with the anchor list.
//!
//! A score map has `2 * A` channels: channel `a` holds the background score
//! of anchor shape `a` and channel `A + a` its foreground score. A delta map
//! has `4 * A` channels: channel `4 * a + k` holds component `k` of
//! `(dx, dy, dw, dh)` for shape `a`. Both are flattened to one entry per
//! anchor in the order named by `AnchorLayout`.

use crate::bbox::BoxDelta;
use crate::map::FeatureMap;
use crate::util::{ProposalError, ProposalResult};

/// Order in which anchors enumerate `(shape, row, column)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorLayout {
    /// Positions outermost, shapes innermost: `r = (y * W + x) * A + a`.
    #[default]
    PositionMajor,
    /// Shapes outermost: `r = (a * H + y) * W + x`.
    ShapeMajor,
}

impl AnchorLayout {
    /// Flat anchor index of shape `a` at `(y, x)` in an `A x H x W` grid.
    pub fn index(
        self,
        a: usize,
        y: usize,
        x: usize,
        shapes: usize,
        height: usize,
        width: usize,
    ) -> usize {
        match self {
            AnchorLayout::PositionMajor => (y * width + x) * shapes + a,
            AnchorLayout::ShapeMajor => (a * height + y) * width + x,
        }
    }

    /// Visits `(shape, position)` pairs in flat anchor order.
    fn for_each_slot(self, shapes: usize, positions: usize, mut f: impl FnMut(usize, usize)) {
        match self {
            AnchorLayout::PositionMajor => {
                for pos in 0..positions {
                    for a in 0..shapes {
                        f(a, pos);
                    }
                }
            }
            AnchorLayout::ShapeMajor => {
                for a in 0..shapes {
                    for pos in 0..positions {
                        f(a, pos);
                    }
                }
            }
        }
    }
}

/// Validated anchor grid dimensions derived from a score/delta map pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AnchorGrid {
    pub(crate) shapes: usize,
    pub(crate) height: usize,
    pub(crate) width: usize,
}

impl AnchorGrid {
    /// Derives the grid and checks that both maps describe one image with
    /// consistent channel and spatial dimensions.
    pub(crate) fn from_maps(
        scores: &FeatureMap<'_>,
        deltas: &FeatureMap<'_>,
    ) -> ProposalResult<Self> {
        for map in [scores, deltas] {
            if map.batch() != 1 {
                return Err(ProposalError::UnsupportedBatchSize { batch: map.batch() });
            }
        }
        if scores.channels() % 2 != 0 {
            return Err(ProposalError::OddScoreChannels {
                channels: scores.channels(),
            });
        }
        let shapes = scores.channels() / 2;
        let delta_channels = shapes
            .checked_mul(4)
            .ok_or(ProposalError::InvalidDimensions {
                batch: scores.batch(),
                channels: scores.channels(),
                height: scores.height(),
                width: scores.width(),
            })?;
        let expected = [
            (delta_channels, deltas.channels(), "delta map channels"),
            (scores.height(), deltas.height(), "delta map height"),
            (scores.width(), deltas.width(), "delta map width"),
        ];
        for (expected, got, context) in expected {
            if expected != got {
                return Err(ProposalError::ShapeMismatch {
                    expected,
                    got,
                    context,
                });
            }
        }
        Ok(Self {
            shapes,
            height: scores.height(),
            width: scores.width(),
        })
    }

    /// Number of anchors `A * H * W`.
    pub(crate) fn len(&self) -> usize {
        self.shapes * self.height * self.width
    }

    fn positions(&self) -> usize {
        self.height * self.width
    }
}

/// Foreground scores, one per anchor.
pub(crate) fn foreground_scores(
    map: &FeatureMap<'_>,
    grid: AnchorGrid,
    layout: AnchorLayout,
) -> ProposalResult<Vec<f32>> {
    if grid.len() == 0 {
        return Ok(Vec::new());
    }
    let planes = (0..grid.shapes)
        .map(|a| {
            map.plane(0, grid.shapes + a)
                .ok_or(ProposalError::MalformedInput("score plane out of range"))
        })
        .collect::<ProposalResult<Vec<_>>>()?;

    let mut out = Vec::with_capacity(grid.len());
    layout.for_each_slot(grid.shapes, grid.positions(), |a, pos| {
        out.push(planes[a][pos]);
    });
    Ok(out)
}

/// Box deltas, one per anchor.
pub(crate) fn box_deltas(
    map: &FeatureMap<'_>,
    grid: AnchorGrid,
    layout: AnchorLayout,
) -> ProposalResult<Vec<BoxDelta>> {
    if grid.len() == 0 {
        return Ok(Vec::new());
    }
    let planes = (0..grid.shapes * 4)
        .map(|c| {
            map.plane(0, c)
                .ok_or(ProposalError::MalformedInput("delta plane out of range"))
        })
        .collect::<ProposalResult<Vec<_>>>()?;

    let mut out = Vec::with_capacity(grid.len());
    layout.for_each_slot(grid.shapes, grid.positions(), |a, pos| {
        let base = 4 * a;
        out.push(BoxDelta::new(
            planes[base][pos],
            planes[base + 1][pos],
            planes[base + 2][pos],
            planes[base + 3][pos],
        ));
    });
    Ok(out)
}
