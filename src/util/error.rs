//! Error types for rpnprop.

use thiserror::Error;

/// Result alias for proposal operations.
pub type ProposalResult<T> = std::result::Result<T, ProposalError>;

/// Errors that can occur while generating proposals.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProposalError {
    /// The prediction maps carry a batch size other than one.
    #[error("unsupported batch size {batch}: only one image per call is supported")]
    UnsupportedBatchSize { batch: usize },
    /// The input data is inconsistent.
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
    /// Two co-indexed inputs disagree on a length or dimension.
    #[error("{context} mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        expected: usize,
        got: usize,
        context: &'static str,
    },
    /// The score map does not carry two channels per anchor shape.
    #[error("score map must have an even channel count (background/foreground), got {channels}")]
    OddScoreChannels { channels: usize },
    /// Map dimensions overflow when multiplied out.
    #[error("invalid map dimensions {batch}x{channels}x{height}x{width}")]
    InvalidDimensions {
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    },
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Accelerated suppression was requested but is not compiled in.
    #[error("accelerated suppression requested but the `rayon` feature is disabled")]
    AcceleratorUnavailable,
}

impl ProposalError {
    /// Returns true for errors caused by inconsistent input shapes or values.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput(_)
                | Self::ShapeMismatch { .. }
                | Self::OddScoreChannels { .. }
                | Self::InvalidDimensions { .. }
        )
    }
}
