//! Low-level building blocks for custom proposal pipelines.
//!
//! These functions expose the individual stages behind `ProposalCreator`:
//! box regression, clipping and filtering, ranking, and greedy suppression.
//! Most users should prefer `ProposalCreator::propose`.

pub use crate::bbox::regression::{decode, decode_one, encode};
pub use crate::candidate::filter::{clip_boxes, filter_and_rank, size_filter};
pub use crate::candidate::nms::nms_greedy;
#[cfg(feature = "rayon")]
pub use crate::candidate::nms::nms_greedy_par;
pub use crate::candidate::rank::{rank_desc, truncate_budget};
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::suppression_mask_par;
pub use crate::kernel::scalar::IouScalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::IouSimd;
pub use crate::kernel::{DefaultKernel, OverlapKernel};
