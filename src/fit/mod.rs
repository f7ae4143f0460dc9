//! Brute-force fitting of a piecewise model to data.
//!
//! [`SearchRunner`] scores every combination of an
//! [`Orchestrator`](crate::orchestrator::Orchestrator) with an
//! [`Objective`] and reports the lowest cost. Two modes:
//!
//! - **sequential**: walks the orchestrator's iterator on the calling
//!   thread
//! - **parallel**: splits `[0, total)` into contiguous chunks decoded
//!   with `make_at` on rayon workers (requires the `parallel` feature;
//!   otherwise the chunks run on the calling thread)
//!
//! Both modes visit the same combinations and break ties by the lowest
//! global index, so they report the same best combination.

mod config;
mod runner;
mod score;

pub use config::SearchConfig;
pub use runner::{BestCombination, SearchResult, SearchRunner};
pub use score::{correlation, mse, pearson, CorrelationObjective, MseObjective, Objective, Sample};
