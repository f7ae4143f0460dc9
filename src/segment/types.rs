//! The polymorphic segment interface used by the orchestrator.

use super::cursor::CursorState;
use crate::model::{DomainHandle, ModelHandle};
use crate::search::{IndexSpace, IndexStrategy};

/// One piece of a piecewise model: a domain, a parameter grid and a
/// traversal cursor.
///
/// Segments come in two kinds:
///
/// - **free** segments build their model from the grid alone
/// - **constrained** segments also read the models already built for
///   their immediate neighbors, and fit their own parameters to the
///   neighbors' outputs at two boundary inputs
///
/// The orchestrator builds all free segments first, then all constrained
/// ones, so a constrained segment always sees both neighbors.
///
/// # Access modes
///
/// `reset`/`advance` mutate the cursor and belong to single-threaded
/// sequential iteration. [`build_at`](Segment::build_at) and every other
/// `&self` method never touch the cursor and can be called from many
/// threads at once.
pub trait Segment<I, O>: Send + Sync {
    /// Display name of the segment.
    fn name(&self) -> &str;

    /// The segment's domain predicate.
    fn domain(&self) -> DomainHandle<I>;

    /// Per-parameter range sizes.
    fn bases(&self) -> Vec<usize>;

    /// The segment's index space.
    fn space(&self) -> IndexSpace {
        IndexSpace::new(self.bases())
    }

    /// Number of parameter combinations (1 with no parameters).
    fn size(&self) -> usize {
        self.space().total()
    }

    /// Whether the segment fits itself to its neighbors.
    fn is_constrained(&self) -> bool;

    /// Replaces the traversal strategy; the cursor becomes unset.
    fn set_strategy(&mut self, strategy: Box<dyn IndexStrategy>);

    /// Recomputes the index space and positions the cursor on the first
    /// variant (or exhausts it when the space is empty).
    fn reset(&mut self);

    /// Moves to the next variant. Returns `false` once exhausted.
    fn advance(&mut self) -> bool;

    /// Current cursor state.
    fn state(&self) -> CursorState;

    /// The cursor's multi-index, if positioned.
    fn current_index(&self) -> Option<&[usize]>;

    /// The cursor's local ordinal.
    ///
    /// `None` if the cursor is not positioned or any base is 0.
    fn current_local(&self) -> Option<usize>;

    /// Decodes a local ordinal into a multi-index.
    fn index_at(&self, local: usize) -> Vec<usize> {
        self.space().unrank(local)
    }

    /// Encodes a multi-index as a local ordinal.
    fn local_from_index(&self, index: &[usize]) -> Option<usize> {
        self.space().rank(index)
    }

    /// Builds the model for `local` without touching the cursor.
    ///
    /// `built` holds one slot per segment of the orchestrator and
    /// `position` is this segment's slot. Free segments ignore `built`.
    /// Constrained segments read `built[position - 1]` and
    /// `built[position + 1]` and return `None` if either is missing.
    /// `None` is also returned for an out-of-range `local`.
    fn build_at(
        &self,
        local: usize,
        built: &[Option<ModelHandle<I, O>>],
        position: usize,
    ) -> Option<ModelHandle<I, O>>;

    /// Reports `(label, position, value)` for each parameter of `local`.
    fn for_each_param_at(&self, local: usize, f: &mut dyn FnMut(&str, usize, String));
}
