//! Segments fitted to the boundary outputs of their neighbors.

use super::base::SegmentBase;
use super::cursor::CursorState;
use super::types::Segment;
use crate::model::{Domain, DomainHandle, Model, ModelHandle};
use crate::params::ParamGrid;
use crate::search::IndexStrategy;
use std::marker::PhantomData;
use std::sync::Arc;

/// A segment whose model is completed from its neighbors' outputs.
///
/// For each combination the segment
///
/// 1. evaluates the left neighbor at `left_input` and the right
///    neighbor at `right_input`,
/// 2. builds a draft `M` from its own grid (often a unit grid),
/// 3. calls `binder(&mut draft, &left_output, &right_output)` to set
///    the remaining fields.
///
/// A constrained segment must sit strictly between two free segments;
/// [`OrchestratorBuilder::build`](crate::orchestrator::OrchestratorBuilder::build)
/// rejects any other layout.
///
/// # Examples
///
/// Bridging two neighbors with a straight line:
///
/// ```
/// use std::sync::Arc;
/// use u_piecewise::model::{Interval, Model, ModelHandle};
/// use u_piecewise::params::ParamGrid;
/// use u_piecewise::segment::{ConstrainedSegment, Segment};
///
/// #[derive(Default)]
/// struct Line { k: f64, m: f64 }
///
/// impl Model<f64, f64> for Line {
///     fn evaluate(&self, x: &f64) -> f64 { self.k * x + self.m }
/// }
///
/// let (x1, x2) = (0.0, 2.0);
/// let bridge: ConstrainedSegment<Line, f64, f64, _> = ConstrainedSegment::new(
///     Interval::between(x1, x2),
///     ParamGrid::new(),
///     x1,
///     x2,
///     move |line: &mut Line, y1: &f64, y2: &f64| {
///         line.k = (y2 - y1) / (x2 - x1);
///         line.m = y1 - line.k * x1;
///     },
/// );
///
/// let left: ModelHandle<f64, f64> = Arc::new(|_: &f64| 1.0);
/// let right: ModelHandle<f64, f64> = Arc::new(|_: &f64| 3.0);
/// let built = [Some(left), None, Some(right)];
///
/// let line = bridge.build_at(0, &built, 1).unwrap();
/// assert_eq!(line.evaluate(&1.0), 2.0);
/// ```
pub struct ConstrainedSegment<M: 'static, I, O, B> {
    base: SegmentBase<M, I>,
    left_input: I,
    right_input: I,
    binder: B,
    _out: PhantomData<fn() -> O>,
}

impl<M: 'static, I, O, B> ConstrainedSegment<M, I, O, B>
where
    B: Fn(&mut M, &O, &O) + Send + Sync,
{
    pub fn new<D>(domain: D, grid: ParamGrid<M>, left_input: I, right_input: I, binder: B) -> Self
    where
        D: Domain<I> + 'static,
    {
        Self {
            base: SegmentBase::new(domain, grid),
            left_input,
            right_input,
            binder,
            _out: PhantomData,
        }
    }

    /// Sets the display name. An empty name restores the default.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(name);
        self
    }

    pub fn grid(&self) -> &ParamGrid<M> {
        &self.base.grid
    }

    /// Inputs at which the left and right neighbors are sampled.
    pub fn boundary_inputs(&self) -> (&I, &I) {
        (&self.left_input, &self.right_input)
    }
}

impl<M, I, O, B> Segment<I, O> for ConstrainedSegment<M, I, O, B>
where
    M: Model<I, O> + Default + 'static,
    I: Send + Sync + 'static,
    O: 'static,
    B: Fn(&mut M, &O, &O) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.base.name
    }

    fn domain(&self) -> DomainHandle<I> {
        Arc::clone(&self.base.domain)
    }

    fn bases(&self) -> Vec<usize> {
        self.base.grid.bases()
    }

    fn is_constrained(&self) -> bool {
        true
    }

    fn set_strategy(&mut self, strategy: Box<dyn IndexStrategy>) {
        self.base.set_strategy(strategy);
    }

    fn reset(&mut self) {
        self.base.reset();
    }

    fn advance(&mut self) -> bool {
        self.base.advance()
    }

    fn state(&self) -> CursorState {
        self.base.state()
    }

    fn current_index(&self) -> Option<&[usize]> {
        self.base.current_index()
    }

    fn current_local(&self) -> Option<usize> {
        self.base.current_local()
    }

    fn build_at(
        &self,
        local: usize,
        built: &[Option<ModelHandle<I, O>>],
        position: usize,
    ) -> Option<ModelHandle<I, O>> {
        let left = built.get(position.checked_sub(1)?)?.as_ref()?;
        let right = built.get(position + 1)?.as_ref()?;
        let index = self.base.checked_index(local)?;

        let left_output = left.evaluate(&self.left_input);
        let right_output = right.evaluate(&self.right_input);

        let mut model = self.base.grid.make_model(&index);
        (self.binder)(&mut model, &left_output, &right_output);
        Some(Arc::new(model))
    }

    fn for_each_param_at(&self, local: usize, f: &mut dyn FnMut(&str, usize, String)) {
        self.base.describe(local, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Interval;
    use crate::params::UniformRange;

    #[derive(Debug, Default, Clone)]
    struct Line {
        k: f64,
        m: f64,
        offset: f64,
    }

    impl Model<f64, f64> for Line {
        fn evaluate(&self, x: &f64) -> f64 {
            self.k * x + self.m + self.offset
        }
    }

    fn bridge(x1: f64, x2: f64) -> impl Segment<f64, f64> {
        let grid = ParamGrid::new().with_param(
            "offset",
            UniformRange::new(0.0, 1.0, 1.0),
            |l: &mut Line, v| l.offset = v,
        );
        ConstrainedSegment::new(
            Interval::between(x1, x2),
            grid,
            x1,
            x2,
            move |line: &mut Line, y1: &f64, y2: &f64| {
                line.k = (y2 - y1) / (x2 - x1);
                line.m = y1 - line.k * x1;
            },
        )
    }

    fn constant(c: f64) -> Option<ModelHandle<f64, f64>> {
        Some(Arc::new(move |_: &f64| c))
    }

    #[test]
    fn test_fits_between_neighbors() {
        let seg = bridge(0.0, 2.0);
        assert!(seg.is_constrained());
        assert_eq!(seg.size(), 2);

        let built = vec![constant(1.0), None, constant(3.0)];
        let line = seg.build_at(0, &built, 1).expect("both neighbors built");
        assert_eq!(line.evaluate(&0.0), 1.0);
        assert_eq!(line.evaluate(&1.0), 2.0);
        assert_eq!(line.evaluate(&2.0), 3.0);
    }

    #[test]
    fn test_grid_parameters_survive_binding() {
        let seg = bridge(0.0, 2.0);
        let built = vec![constant(1.0), None, constant(3.0)];
        let line = seg.build_at(1, &built, 1).expect("both neighbors built");
        assert_eq!(line.evaluate(&0.0), 2.0);
    }

    #[test]
    fn test_missing_neighbor_yields_none() {
        let seg = bridge(0.0, 2.0);
        assert!(seg.build_at(0, &[None, None, constant(3.0)], 1).is_none());
        assert!(seg.build_at(0, &[constant(1.0), None, None], 1).is_none());
        assert!(seg.build_at(0, &[None, constant(1.0)], 0).is_none());
        assert!(seg.build_at(0, &[constant(1.0), None], 1).is_none());
    }

    #[test]
    fn test_state_untouched_by_build() {
        let mut seg = bridge(0.0, 1.0);
        assert_eq!(seg.state(), CursorState::Unset);
        let built = vec![constant(0.0), None, constant(0.0)];
        let _ = seg.build_at(0, &built, 1);
        assert_eq!(seg.state(), CursorState::Unset);
        seg.reset();
        assert_eq!(seg.current_local(), Some(0));
    }
}
