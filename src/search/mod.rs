//! Index spaces and traversal strategies.
//!
//! An [`IndexSpace`] describes a finite mixed-radix space (one base per
//! parameter dimension). An [`IndexStrategy`] walks that space one
//! multi-index at a time. All strategies honor the same contract, so
//! the orchestrator can swap them through [`StrategyKind`] without any
//! change to decoding: the global index of a combination never depends
//! on the strategy that produced it.

mod space;
mod strategy;

pub use space::IndexSpace;
pub use strategy::{ForwardStrategy, IndexStrategy, ReverseStrategy, ShuffledStrategy, StrategyKind};
