//! Discretized brute-force search for piecewise models.
//!
//! The input domain is split into segments, each governed by its own
//! parameterized sub-model. Every parameter is discretized into a range,
//! and the crate enumerates every cross-segment combination so that a
//! caller-supplied objective can pick the best one.
//!
//! - **Search spaces** ([`search`]): mixed-radix index spaces and
//!   pluggable traversal strategies (forward, reverse, seeded shuffle).
//! - **Parameters** ([`params`]): ranges and grids binding each range to
//!   a model field through a setter closure.
//! - **Models** ([`model`]): the `Model`/`Domain` traits and
//!   [`PiecewiseModel`](model::PiecewiseModel), evaluated by first
//!   matching domain.
//! - **Segments** ([`segment`]): free segments, and constrained segments
//!   fitted to their neighbors' outputs at two boundary inputs.
//! - **Orchestrator** ([`orchestrator`]): composes segments, either by
//!   sequential iteration or by stateless decoding of a global index.
//! - **Fitting** ([`fit`]): sequential and parallel brute-force search
//!   with MSE and correlation objectives.
//!
//! # Example
//!
//! ```
//! use u_piecewise::model::{Interval, Model};
//! use u_piecewise::orchestrator::OrchestratorBuilder;
//! use u_piecewise::params::{ParamGrid, UniformRange};
//!
//! #[derive(Default)]
//! struct Parabola { a: f64 }
//!
//! impl Model<f64, f64> for Parabola {
//!     fn evaluate(&self, x: &f64) -> f64 { self.a * x * x }
//! }
//!
//! #[derive(Default)]
//! struct Line { k: f64, m: f64 }
//!
//! impl Model<f64, f64> for Line {
//!     fn evaluate(&self, x: &f64) -> f64 { self.k * x + self.m }
//! }
//!
//! let (x1, x2) = (-1.0, 1.0);
//! let mut orch = OrchestratorBuilder::<f64, f64>::new()
//!     .free(Interval::below(x1), ParamGrid::<Parabola>::new()
//!         .with_param("a", UniformRange::fixed(1.0), |p, v| p.a = v))
//!     .constrained(Interval::between(x1, x2), ParamGrid::<Line>::new(), x1, x2,
//!         move |l: &mut Line, y1: &f64, y2: &f64| {
//!             l.k = (y2 - y1) / (x2 - x1);
//!             l.m = y1 - l.k * x1;
//!         })
//!     .free(Interval::at_or_above(x2), ParamGrid::<Parabola>::new()
//!         .with_param("a", UniformRange::fixed(0.5), |p, v| p.a = v))
//!     .build()
//!     .unwrap();
//!
//! let model = orch.next().unwrap();
//! assert_eq!(model.evaluate(&x1), 1.0);
//! assert_eq!(model.evaluate(&0.0), 0.75);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon workers for [`fit::SearchRunner`]
//! - `serde`: `Serialize`/`Deserialize` for configs, ranges and results

pub mod error;
pub mod fit;
pub mod model;
pub mod orchestrator;
pub mod params;
pub mod search;
pub mod segment;

pub use error::PiecewiseError;
