//! Registration and layout validation.

use super::engine::Orchestrator;
use crate::error::PiecewiseError;
use crate::model::{Domain, Model};
use crate::params::ParamGrid;
use crate::search::{IndexSpace, StrategyKind};
use crate::segment::{ConstrainedSegment, FreeSegment, Segment};

/// Collects segments in domain order and builds an [`Orchestrator`].
///
/// # Examples
///
/// ```
/// use u_piecewise::model::Interval;
/// use u_piecewise::orchestrator::OrchestratorBuilder;
/// use u_piecewise::params::{ParamGrid, UniformRange};
///
/// #[derive(Default)]
/// struct Constant(f64);
///
/// impl u_piecewise::model::Model<f64, f64> for Constant {
///     fn evaluate(&self, _: &f64) -> f64 { self.0 }
/// }
///
/// let grid = || {
///     ParamGrid::<Constant>::new()
///         .with_param("c", UniformRange::new(0.0, 1.0, 0.5), |m, v| m.0 = v)
/// };
/// let orch = OrchestratorBuilder::<f64, f64>::new()
///     .free(Interval::below(0.0), grid())
///     .free(Interval::at_or_above(0.0), grid())
///     .build()
///     .unwrap();
///
/// assert_eq!(orch.size(), 9);
/// ```
pub struct OrchestratorBuilder<I, O> {
    segments: Vec<Box<dyn Segment<I, O>>>,
    strategy: StrategyKind,
}

impl<I, O> OrchestratorBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: 'static,
{
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            strategy: StrategyKind::default(),
        }
    }

    /// Traversal strategy installed on every segment at build time.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Appends a free segment.
    pub fn free<M, D>(self, domain: D, grid: ParamGrid<M>) -> Self
    where
        M: Model<I, O> + Default + 'static,
        D: Domain<I> + 'static,
    {
        self.segment(Box::new(FreeSegment::new(domain, grid)))
    }

    /// Appends a free segment with a display name.
    pub fn free_named<M, D>(self, name: impl Into<String>, domain: D, grid: ParamGrid<M>) -> Self
    where
        M: Model<I, O> + Default + 'static,
        D: Domain<I> + 'static,
    {
        self.segment(Box::new(FreeSegment::new(domain, grid).with_name(name)))
    }

    /// Appends a segment fitted to its neighbors' outputs at
    /// `left_input` and `right_input`.
    pub fn constrained<M, D, B>(
        self,
        domain: D,
        grid: ParamGrid<M>,
        left_input: I,
        right_input: I,
        binder: B,
    ) -> Self
    where
        M: Model<I, O> + Default + 'static,
        D: Domain<I> + 'static,
        B: Fn(&mut M, &O, &O) + Send + Sync + 'static,
    {
        self.segment(Box::new(ConstrainedSegment::new(
            domain,
            grid,
            left_input,
            right_input,
            binder,
        )))
    }

    /// Appends a named constrained segment.
    pub fn constrained_named<M, D, B>(
        self,
        name: impl Into<String>,
        domain: D,
        grid: ParamGrid<M>,
        left_input: I,
        right_input: I,
        binder: B,
    ) -> Self
    where
        M: Model<I, O> + Default + 'static,
        D: Domain<I> + 'static,
        B: Fn(&mut M, &O, &O) + Send + Sync + 'static,
    {
        let seg = ConstrainedSegment::new(domain, grid, left_input, right_input, binder)
            .with_name(name);
        self.segment(Box::new(seg))
    }

    /// Appends any [`Segment`] implementation.
    pub fn segment(mut self, segment: Box<dyn Segment<I, O>>) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Validates the layout and builds the orchestrator.
    ///
    /// # Errors
    ///
    /// - [`PiecewiseError::ConstrainedAtBoundary`] if a constrained
    ///   segment is first or last
    /// - [`PiecewiseError::ChainedConstraint`] if two constrained segments
    ///   are adjacent
    /// - [`PiecewiseError::SpaceOverflow`] if a segment's or the whole
    ///   combination count does not fit in `usize`
    pub fn build(mut self) -> Result<Orchestrator<I, O>, PiecewiseError> {
        validate_layout(&self.segments)?;

        let mut sizes = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            sizes.push(IndexSpace::try_new(seg.bases())?.total());
        }
        let space = IndexSpace::try_new(sizes)?;

        for seg in self.segments.iter_mut() {
            seg.set_strategy(self.strategy.build());
        }

        tracing::debug!(
            segments = self.segments.len(),
            total = space.total(),
            strategy = ?self.strategy,
            "orchestrator built"
        );

        Ok(Orchestrator::new(self.segments, space, self.strategy))
    }
}

impl<I, O> Default for OrchestratorBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn validate_layout<I, O>(segments: &[Box<dyn Segment<I, O>>]) -> Result<(), PiecewiseError> {
    let len = segments.len();
    for (position, seg) in segments.iter().enumerate() {
        if !seg.is_constrained() {
            continue;
        }
        if position == 0 || position + 1 == len {
            return Err(PiecewiseError::ConstrainedAtBoundary { position, len });
        }
        // the left neighbor was checked on the previous iteration
        if segments[position + 1].is_constrained() {
            return Err(PiecewiseError::ChainedConstraint {
                position,
                neighbor: position + 1,
            });
        }
    }
    Ok(())
}
