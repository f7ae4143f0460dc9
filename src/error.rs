//! Error type shared by the registration, decoding and search layers.

use thiserror::Error;

/// Errors reported by `u-piecewise`.
///
/// Configuration problems are detected when an orchestrator is built or a
/// search is configured; they never surface as panics during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PiecewiseError {
    /// A constrained segment was registered without a segment on both sides.
    #[error("constrained segment at position {position} needs a neighbor on both sides ({len} segments registered)")]
    ConstrainedAtBoundary { position: usize, len: usize },

    /// Two constrained segments are adjacent.
    #[error("constrained segment at position {position} has a constrained neighbor at position {neighbor}")]
    ChainedConstraint { position: usize, neighbor: usize },

    /// The number of combinations does not fit in `usize`.
    #[error("combination space overflows usize")]
    SpaceOverflow,

    /// A global index outside `[0, total)`.
    #[error("global index {index} out of range (total {total})")]
    IndexOutOfRange { index: usize, total: usize },

    /// A segment produced no model for the requested combination.
    #[error("segment {position} produced no model")]
    MissingModel { position: usize },

    /// A search configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
