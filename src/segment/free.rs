//! Segments whose parameters come straight from their grid.

use super::base::SegmentBase;
use super::cursor::CursorState;
use super::types::Segment;
use crate::model::{Domain, DomainHandle, Model, ModelHandle};
use crate::params::ParamGrid;
use crate::search::IndexStrategy;
use std::marker::PhantomData;
use std::sync::Arc;

/// A segment that builds `M` from its grid alone.
///
/// # Examples
///
/// ```
/// use u_piecewise::model::{Interval, Model};
/// use u_piecewise::params::{ParamGrid, UniformRange};
/// use u_piecewise::segment::{FreeSegment, Segment};
///
/// #[derive(Default)]
/// struct Constant(f64);
///
/// impl Model<f64, f64> for Constant {
///     fn evaluate(&self, _: &f64) -> f64 { self.0 }
/// }
///
/// let grid = ParamGrid::<Constant>::new()
///     .with_param("c", UniformRange::new(0.0, 2.0, 1.0), |m, v| m.0 = v);
/// let seg: FreeSegment<Constant, f64, f64> = FreeSegment::new(Interval::everywhere(), grid);
///
/// assert_eq!(seg.size(), 3);
/// let model = seg.build_at(2, &[], 0).unwrap();
/// assert_eq!(model.evaluate(&0.0), 2.0);
/// ```
pub struct FreeSegment<M: 'static, I, O> {
    base: SegmentBase<M, I>,
    _out: PhantomData<fn() -> O>,
}

impl<M: 'static, I, O> FreeSegment<M, I, O> {
    pub fn new<D>(domain: D, grid: ParamGrid<M>) -> Self
    where
        D: Domain<I> + 'static,
    {
        Self {
            base: SegmentBase::new(domain, grid),
            _out: PhantomData,
        }
    }

    /// Sets the display name. An empty name restores the default
    /// (the model's type name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(name);
        self
    }

    pub fn grid(&self) -> &ParamGrid<M> {
        &self.base.grid
    }
}

impl<M, I, O> Segment<I, O> for FreeSegment<M, I, O>
where
    M: Model<I, O> + Default + 'static,
    I: 'static,
    O: 'static,
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
        false
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
        _built: &[Option<ModelHandle<I, O>>],
        _position: usize,
    ) -> Option<ModelHandle<I, O>> {
        let index = self.base.checked_index(local)?;
        Some(Arc::new(self.base.grid.make_model(&index)))
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

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Line {
        k: f64,
        m: f64,
    }

    impl Model<f64, f64> for Line {
        fn evaluate(&self, x: &f64) -> f64 {
            self.k * x + self.m
        }
    }

    fn segment() -> FreeSegment<Line, f64, f64> {
        let grid = ParamGrid::new()
            .with_param("k", UniformRange::new(0.0, 2.0, 1.0), |l: &mut Line, v| l.k = v)
            .with_param("m", UniformRange::new(-1.0, 1.0, 2.0), |l: &mut Line, v| l.m = v);
        FreeSegment::new(Interval::everywhere(), grid).with_name("line")
    }

    #[test]
    fn test_size_and_flags() {
        let seg = segment();
        assert_eq!(seg.size(), 6);
        assert!(!seg.is_constrained());
        assert_eq!(seg.name(), "line");
        assert_eq!(seg.state(), CursorState::Unset);
    }

    #[test]
    fn test_build_at_is_stateless() {
        let mut seg = segment();
        seg.reset();
        let before = seg.current_index().map(<[usize]>::to_vec);

        // local 4 = k index 1, m index 1
        let model = seg.build_at(4, &[], 0).expect("in range");
        assert_eq!(model.evaluate(&2.0), 3.0);
        assert_eq!(seg.current_index().map(<[usize]>::to_vec), before);
    }

    #[test]
    fn test_build_at_out_of_range() {
        assert!(segment().build_at(6, &[], 0).is_none());
    }

    #[test]
    fn test_sequential_matches_stateless() {
        let mut seg = segment();
        seg.reset();
        let mut visited = 0;
        loop {
            let local = seg.current_local().expect("positioned");
            assert_eq!(seg.index_at(local), seg.current_index().unwrap());
            assert_eq!(seg.local_from_index(seg.current_index().unwrap()), Some(local));
            visited += 1;
            if !seg.advance() {
                break;
            }
        }
        assert_eq!(visited, seg.size());
        assert_eq!(seg.state(), CursorState::Exhausted);
    }

    #[test]
    fn test_for_each_param_at() {
        let seg = segment();
        let mut out = Vec::new();
        seg.for_each_param_at(5, &mut |label, _, value| out.push(format!("{label}={value}")));
        assert_eq!(out, vec!["k=2", "m=1"]);
    }

    #[test]
    fn test_zero_size_segment_is_exhausted() {
        let grid = ParamGrid::new().with_param(
            "k",
            UniformRange::new(0.0, 1.0, 0.0),
            |l: &mut Line, v| l.k = v,
        );
        let mut seg: FreeSegment<Line, f64, f64> = FreeSegment::new(Interval::everywhere(), grid);
        assert_eq!(seg.size(), 0);
        seg.reset();
        assert_eq!(seg.state(), CursorState::Exhausted);
        assert_eq!(seg.current_local(), None);
    }
}
