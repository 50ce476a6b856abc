//! rpnprop generates region proposals for two-stage object detectors.
//!
//! Given anchors and a region proposal network's per-anchor foreground scores
//! and box deltas, the crate decodes candidate boxes, clips and size-filters
//! them, ranks them by score, applies greedy IoU suppression and returns RoI
//! records for a single image. Suppression runs on the CPU, with an optional
//! parallel path via the `rayon` feature and SIMD overlap rows via `simd`.

pub mod bbox;
mod candidate;
pub mod kernel;
pub mod lowlevel;
pub mod map;
pub mod proposal;
mod trace;
pub mod util;

pub use bbox::{BBox, BoxDelta, ImageSize};
pub use map::FeatureMap;
pub use proposal::{AnchorLayout, Mode, Proposal, ProposalConfig, ProposalCreator, Roi};
pub use util::{ProposalError, ProposalResult};

pub use candidate::nms::{GreedyNms, Suppressor};
