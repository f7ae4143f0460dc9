//! Segments: a domain, a parameter grid and a traversal cursor.
//!
//! - [`FreeSegment`]: parameters come from the grid alone
//! - [`ConstrainedSegment`]: parameters are completed from the outputs
//!   of the two neighboring segments at fixed boundary inputs
//!
//! Both implement [`Segment`], the object-safe interface the
//! orchestrator stores as `Box<dyn Segment<I, O>>`.

mod base;
mod constrained;
mod cursor;
mod free;
mod types;

pub use constrained::ConstrainedSegment;
pub use cursor::CursorState;
pub use free::FreeSegment;
pub use types::Segment;
