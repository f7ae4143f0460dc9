//! Value types produced by the orchestrator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of the combination last returned by sequential iteration.
///
/// `step` counts every combination visited since the last reset,
/// including the ones that were skipped. `indices[i]` is the multi-index
/// of segment `i`. Pass a snapshot to
/// [`Orchestrator::global_of`](super::Orchestrator::global_of) to get
/// the matching global index for [`make_at`](super::Orchestrator::make_at).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub step: usize,
    pub indices: Vec<Vec<usize>>,
}
