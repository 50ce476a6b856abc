//! Candidate selection and pruning utilities.
//!
//! Includes clipping and size filtering, score ranking with budgets, and
//! greedy IoU non-maximum suppression.

pub(crate) mod filter;
pub(crate) mod nms;
pub(crate) mod rank;
