//! Models, domains and their piecewise composition.
//!
//! - [`Model`]: pure `input -> output` function
//! - [`Domain`]: predicate choosing which piece handles an input
//! - [`PiecewiseModel`]: ordered `(domain, model)` pairs, first match wins
//! - [`Sentinel`]: output used when no domain matches

mod domain;
mod piecewise;
mod types;

pub use domain::Interval;
pub use piecewise::{DomainHandle, ModelHandle, Piece, PiecewiseModel};
pub use types::{Domain, Model, Sentinel};
