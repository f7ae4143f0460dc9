//! Composition of segments and enumeration of their combinations.
//!
//! [`OrchestratorBuilder`] registers segments in domain order and
//! validates the layout. The resulting [`Orchestrator`] is both an
//! [`Iterator`] over composed models and a random-access decoder
//! ([`Orchestrator::make_at`]) for parallel search.

mod builder;
mod engine;
mod types;

pub use builder::OrchestratorBuilder;
pub use engine::Orchestrator;
pub use types::Snapshot;
