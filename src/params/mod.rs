//! Parameter ranges and grids.
//!
//! - [`ParamRange`]: one parameter's discretized values
//!   ([`UniformRange`], [`ListRange`])
//! - [`ParamGrid`]: Cartesian product of ranges, each bound to a model
//!   field through a setter closure, with runtime label lookup

mod grid;
mod range;

pub use grid::{ParamGrid, ParamMeta};
pub use range::{ListRange, ParamRange, RangeValue, UniformRange};
