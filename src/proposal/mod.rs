//! Proposal selection: configuration, output records and the orchestrator.
//!
//! `ProposalCreator` validates a pair of prediction maps, realigns them with
//! the anchors, decodes, filters, ranks and suppresses, then emits RoI
//! records. Configuration is fixed at construction; every call is a pure
//! function of its inputs.

mod creator;
pub(crate) mod layout;

pub use creator::ProposalCreator;
pub use layout::AnchorLayout;

use crate::bbox::BBox;
use crate::util::{ProposalError, ProposalResult};

/// Whether proposals feed training or evaluation.
///
/// The two modes only differ in candidate budgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    Train,
    #[default]
    Eval,
}

impl Mode {
    /// Lowercase mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Eval => "eval",
        }
    }
}

/// Configuration for the proposal stage.
///
/// Budgets of 0 disable the corresponding cap.
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalConfig {
    /// IoU at or above which a lower-scoring box is suppressed.
    pub suppression_iou_threshold: f32,
    /// Candidates kept before suppression in training mode.
    pub train_pre_budget: usize,
    /// Proposals kept after suppression in training mode.
    pub train_post_budget: usize,
    /// Candidates kept before suppression in evaluation mode.
    pub eval_pre_budget: usize,
    /// Proposals kept after suppression in evaluation mode.
    pub eval_post_budget: usize,
    /// Minimum box side in pixels at scale 1.0.
    pub min_object_side: f32,
    /// Request the accelerated suppression path.
    ///
    /// Its suppression mask is quadratic in the candidate count; pair it with
    /// a nonzero pre-suppression budget.
    pub prefer_accelerated_suppression: bool,
    /// Flattening order shared by the prediction maps and the anchors.
    pub anchor_layout: AnchorLayout,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            suppression_iou_threshold: 0.7,
            train_pre_budget: 12000,
            train_post_budget: 2000,
            eval_pre_budget: 6000,
            eval_post_budget: 300,
            min_object_side: 16.0,
            prefer_accelerated_suppression: cfg!(feature = "rayon"),
            anchor_layout: AnchorLayout::default(),
        }
    }
}

impl ProposalConfig {
    /// Checks value ranges.
    pub fn validate(&self) -> ProposalResult<()> {
        let thr = self.suppression_iou_threshold;
        if !(thr > 0.0 && thr <= 1.0) {
            return Err(ProposalError::InvalidConfig(
                "suppression_iou_threshold must be in (0, 1]",
            ));
        }
        if !(self.min_object_side.is_finite() && self.min_object_side >= 0.0) {
            return Err(ProposalError::InvalidConfig(
                "min_object_side must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Returns `(pre_budget, post_budget)` for a mode.
    pub fn budgets(&self, mode: Mode) -> (usize, usize) {
        match mode {
            Mode::Train => (self.train_pre_budget, self.train_post_budget),
            Mode::Eval => (self.eval_pre_budget, self.eval_post_budget),
        }
    }
}

/// Region of interest handed to the second stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roi {
    /// Image index within the batch; always 0 for this stage.
    pub batch_index: usize,
    /// Proposal box in input image coordinates.
    pub bbox: BBox,
}

impl Roi {
    /// Returns the `(batch_index, x1, y1, x2, y2)` row.
    pub fn to_array(&self) -> [f32; 5] {
        [
            self.batch_index as f32,
            self.bbox.x1,
            self.bbox.y1,
            self.bbox.x2,
            self.bbox.y2,
        ]
    }
}

/// A kept proposal together with its foreground score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal {
    pub bbox: BBox,
    pub score: f32,
}

impl Proposal {
    /// Drops the score and prefixes the single-image batch index.
    pub fn to_roi(self) -> Roi {
        Roi {
            batch_index: 0,
            bbox: self.bbox,
        }
    }
}
