//! The proposal stage orchestrator.

use crate::bbox::regression::decode;
use crate::bbox::{BBox, ImageSize};
use crate::candidate::filter::filter_and_rank;
use crate::candidate::nms::{GreedyNms, Suppressor};
use crate::candidate::rank::truncate_budget;
use crate::map::FeatureMap;
use crate::proposal::layout::{box_deltas, foreground_scores, AnchorGrid};
use crate::proposal::{Mode, Proposal, ProposalConfig, Roi};
use crate::trace::{trace_event, trace_span};
use crate::util::{ProposalError, ProposalResult};

/// Turns per-anchor predictions into ranked, de-duplicated proposals.
///
/// The creator holds only immutable configuration and a suppressor, so one
/// instance can serve concurrent calls on independent inputs.
#[derive(Clone, Debug)]
pub struct ProposalCreator<S = GreedyNms> {
    cfg: ProposalConfig,
    suppressor: S,
}

impl ProposalCreator<GreedyNms> {
    /// Creates a creator with the built-in greedy suppressor.
    pub fn new(cfg: ProposalConfig) -> ProposalResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            suppressor: GreedyNms,
        })
    }
}

impl Default for ProposalCreator<GreedyNms> {
    fn default() -> Self {
        Self {
            cfg: ProposalConfig::default(),
            suppressor: GreedyNms,
        }
    }
}

impl<S: Suppressor> ProposalCreator<S> {
    /// Replaces the suppressor, keeping the configuration.
    pub fn with_suppressor<T: Suppressor>(self, suppressor: T) -> ProposalCreator<T> {
        ProposalCreator {
            cfg: self.cfg,
            suppressor,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProposalConfig {
        &self.cfg
    }

    /// Generates RoI records for one image.
    ///
    /// `score_map` is `(1, 2A, H, W)`, `delta_map` is `(1, 4A, H, W)` and
    /// `anchors` holds `A * H * W` boxes ordered per the configured
    /// `AnchorLayout`. `image_size` is the size after resizing by
    /// `resize_scale`, which also scales the minimum object side.
    ///
    /// The result holds at most the mode's post-suppression budget and may be
    /// empty.
    pub fn propose(
        &self,
        score_map: &FeatureMap<'_>,
        delta_map: &FeatureMap<'_>,
        anchors: &[BBox],
        image_size: ImageSize,
        resize_scale: f32,
        mode: Mode,
    ) -> ProposalResult<Vec<Roi>> {
        let proposals =
            self.propose_scored(score_map, delta_map, anchors, image_size, resize_scale, mode)?;
        Ok(proposals.into_iter().map(Proposal::to_roi).collect())
    }

    /// Same as [`propose`](Self::propose) but keeps each proposal's score.
    pub fn propose_scored(
        &self,
        score_map: &FeatureMap<'_>,
        delta_map: &FeatureMap<'_>,
        anchors: &[BBox],
        image_size: ImageSize,
        resize_scale: f32,
        mode: Mode,
    ) -> ProposalResult<Vec<Proposal>> {
        let grid = AnchorGrid::from_maps(score_map, delta_map)?;
        if anchors.len() != grid.len() {
            return Err(ProposalError::ShapeMismatch {
                expected: grid.len(),
                got: anchors.len(),
                context: "anchor count",
            });
        }
        if !image_size.is_valid() {
            return Err(ProposalError::MalformedInput(
                "image size must be finite and non-negative",
            ));
        }
        if !(resize_scale.is_finite() && resize_scale > 0.0) {
            return Err(ProposalError::MalformedInput(
                "resize scale must be finite and positive",
            ));
        }

        let _span = trace_span!(
            "propose",
            mode = mode.as_str(),
            anchors = anchors.len(),
            shapes = grid.shapes
        )
        .entered();

        let (pre_budget, post_budget) = self.cfg.budgets(mode);
        let layout = self.cfg.anchor_layout;
        let scores = foreground_scores(score_map, grid, layout)?;
        let deltas = box_deltas(delta_map, grid, layout)?;

        let boxes = decode(anchors, &deltas)?;
        trace_event!("decode", count = boxes.len());
        let min_side = self.cfg.min_object_side * resize_scale;
        let (boxes, scores) = filter_and_rank(boxes, &scores, image_size, min_side, pre_budget)?;
        trace_event!("pre_suppression", count = boxes.len(), budget = pre_budget);

        let mut keep = self.suppressor.suppress(
            &boxes,
            &scores,
            self.cfg.suppression_iou_threshold,
            self.cfg.prefer_accelerated_suppression,
        )?;
        truncate_budget(&mut keep, post_budget);
        trace_event!("post_suppression", count = keep.len(), budget = post_budget);

        keep.into_iter()
            .map(|idx| match (boxes.get(idx), scores.get(idx)) {
                (Some(&bbox), Some(&score)) => Ok(Proposal { bbox, score }),
                _ => Err(ProposalError::MalformedInput(
                    "suppressor returned an out-of-range index",
                )),
            })
            .collect()
    }
}
