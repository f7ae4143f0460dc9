//! Composition of segments into piecewise models.

use super::types::Snapshot;
use crate::error::PiecewiseError;
use crate::model::{ModelHandle, PiecewiseModel};
use crate::search::{IndexSpace, StrategyKind};
use crate::segment::Segment;
use std::fmt;

/// Ordered segments composed into one [`PiecewiseModel`] per combination.
///
/// A combination is one local index per segment. Its global index is the
/// mixed-radix number whose digits are those locals, segment 0 fastest.
///
/// Two access modes:
///
/// - **sequential**: the [`Iterator`] impl walks every combination with
///   an odometer over the segment cursors (`&mut self`)
/// - **stateless**: [`make_at`](Self::make_at) decodes one global index
///   without touching any cursor (`&self`, callable from many threads)
///
/// Under [`StrategyKind::Forward`] step `k` of the iterator and
/// `make_at(k)` build the same model. Other strategies visit the same
/// set in another order; use [`global_of`](Self::global_of) on the
/// [`snapshot`](Self::snapshot) to recover the global index.
///
/// Build with [`OrchestratorBuilder`](super::OrchestratorBuilder).
pub struct Orchestrator<I, O> {
    segments: Vec<Box<dyn Segment<I, O>>>,
    space: IndexSpace,
    strategy: StrategyKind,
    ready: bool,
    finished: bool,
    step: usize,
    last: Option<Snapshot>,
}

impl<I, O> Orchestrator<I, O> {
    pub(crate) fn new(
        segments: Vec<Box<dyn Segment<I, O>>>,
        space: IndexSpace,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            segments,
            space,
            strategy,
            ready: false,
            finished: false,
            step: 0,
            last: None,
        }
    }

    /// Number of combinations: the product of segment sizes, or 0 with no
    /// segments.
    pub fn size(&self) -> usize {
        if self.segments.is_empty() {
            0
        } else {
            self.space.total()
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, position: usize) -> Option<&dyn Segment<I, O>> {
        self.segments.get(position).map(|s| s.as_ref())
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Combinations visited since the last reset.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Rewinds sequential iteration to the first combination.
    ///
    /// Called implicitly by the first `next()`.
    pub fn reset(&mut self) {
        for seg in self.segments.iter_mut() {
            seg.reset();
        }
        self.step = 0;
        self.last = None;
        self.ready = true;
        self.finished = self.size() == 0;
    }

    /// Splits a global index into one local index per segment.
    pub fn decompose(&self, global: usize) -> Option<Vec<usize>> {
        (global < self.size()).then(|| self.space.unrank(global))
    }

    /// Joins per-segment local indices into a global index.
    pub fn compose(&self, locals: &[usize]) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        self.space.rank(locals)
    }

    /// Builds the combination at `global` without touching any cursor.
    ///
    /// # Errors
    ///
    /// - [`PiecewiseError::IndexOutOfRange`] if `global >= size()`
    /// - [`PiecewiseError::MissingModel`] if a segment builds nothing
    pub fn try_make_at(&self, global: usize) -> Result<PiecewiseModel<I, O>, PiecewiseError> {
        let locals = self.decompose(global).ok_or(PiecewiseError::IndexOutOfRange {
            index: global,
            total: self.size(),
        })?;
        self.build_from_locals(&locals)
    }

    /// Builds the combination at `global`, or `None` if it is out of range
    /// or cannot be built.
    pub fn make_at(&self, global: usize) -> Option<PiecewiseModel<I, O>> {
        self.try_make_at(global).ok()
    }

    /// Where sequential iteration last returned a model.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// Global index of the combination recorded in `snapshot`.
    pub fn global_of(&self, snapshot: &Snapshot) -> Option<usize> {
        if snapshot.indices.len() != self.segments.len() {
            return None;
        }
        let locals = self
            .segments
            .iter()
            .zip(&snapshot.indices)
            .map(|(seg, index)| seg.local_from_index(index))
            .collect::<Option<Vec<_>>>()?;
        self.compose(&locals)
    }

    /// Rebuilds the model recorded in `snapshot`.
    pub fn rebuild(&self, snapshot: &Snapshot) -> Option<PiecewiseModel<I, O>> {
        self.make_at(self.global_of(snapshot)?)
    }

    /// Per-segment multi-indices of the combination at `global`.
    pub fn indices_at(&self, global: usize) -> Option<Vec<Vec<usize>>> {
        let locals = self.decompose(global)?;
        Some(
            self.segments
                .iter()
                .zip(locals)
                .map(|(seg, local)| seg.index_at(local))
                .collect(),
        )
    }

    /// Reports `(segment name, label, parameter position, value)` for
    /// every parameter of the combination at `global`.
    pub fn describe_at(
        &self,
        global: usize,
        f: &mut dyn FnMut(&str, &str, usize, String),
    ) -> Result<(), PiecewiseError> {
        let locals = self.decompose(global).ok_or(PiecewiseError::IndexOutOfRange {
            index: global,
            total: self.size(),
        })?;
        for (seg, local) in self.segments.iter().zip(locals) {
            let name = seg.name();
            seg.for_each_param_at(local, &mut |label, position, value| {
                f(name, label, position, value)
            });
        }
        Ok(())
    }

    /// Builds the combination given one local index per segment.
    ///
    /// Free segments are built first, then constrained ones reading their
    /// neighbors' slots.
    pub fn build_from_locals(
        &self,
        locals: &[usize],
    ) -> Result<PiecewiseModel<I, O>, PiecewiseError> {
        if locals.len() != self.segments.len() {
            return Err(PiecewiseError::InvalidConfig(format!(
                "expected {} local indices, got {}",
                self.segments.len(),
                locals.len()
            )));
        }
        let mut built: Vec<Option<ModelHandle<I, O>>> = vec![None; self.segments.len()];
        for constrained in [false, true] {
            for (position, seg) in self.segments.iter().enumerate() {
                if seg.is_constrained() != constrained {
                    continue;
                }
                let model = seg.build_at(locals[position], &built, position);
                built[position] = model;
            }
        }

        let mut composed = PiecewiseModel::with_capacity(self.segments.len());
        for (position, (seg, model)) in self.segments.iter().zip(built).enumerate() {
            let model = model.ok_or(PiecewiseError::MissingModel { position })?;
            composed.push_shared(seg.domain(), model);
        }
        Ok(composed)
    }

    /// Odometer step: segment 0 fastest, carrying rightward.
    fn advance_cursors(&mut self) {
        for seg in self.segments.iter_mut() {
            if seg.advance() {
                return;
            }
            seg.reset();
        }
        self.finished = true;
    }
}

impl<I, O> Iterator for Orchestrator<I, O> {
    type Item = PiecewiseModel<I, O>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.ready {
            self.reset();
        }
        while !self.finished {
            let Some(locals) = self
                .segments
                .iter()
                .map(|seg| seg.current_local())
                .collect::<Option<Vec<_>>>()
            else {
                self.finished = true;
                break;
            };
            let indices = self
                .segments
                .iter()
                .map(|seg| seg.current_index().map(<[usize]>::to_vec).unwrap_or_default())
                .collect();

            let step = self.step;
            let result = self.build_from_locals(&locals);
            self.step += 1;
            self.advance_cursors();

            match result {
                Ok(model) => {
                    self.last = Some(Snapshot { step, indices });
                    return Some(model);
                }
                Err(err) => tracing::warn!(step, error = %err, "skipping combination"),
            }
        }
        None
    }
}

impl<I, O> fmt::Debug for Orchestrator<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.segments.iter().map(|s| s.name()).collect();
        f.debug_struct("Orchestrator")
            .field("segments", &names)
            .field("size", &self.size())
            .field("strategy", &self.strategy)
            .field("step", &self.step)
            .finish()
    }
}
