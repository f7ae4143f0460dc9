//! Brute-force search over every combination.

use super::config::SearchConfig;
use super::score::Objective;
use crate::error::PiecewiseError;
use crate::orchestrator::Orchestrator;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lowest-cost combination found.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BestCombination {
    /// Global index; rebuild with [`Orchestrator::make_at`].
    pub global: usize,

    pub cost: f64,

    /// Per-segment multi-indices.
    pub indices: Vec<Vec<usize>>,
}

/// Result of a search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// `None` if no combination produced a finite cost.
    pub best: Option<BestCombination>,

    /// Combinations built and scored with a finite cost.
    pub evaluated: usize,

    /// Combinations that could not be built or scored non-finite.
    pub skipped: usize,
}

/// Per-worker running minimum. Ties go to the lower global index so that
/// every mode reports the same winner.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    best: Option<(f64, usize)>,
    evaluated: usize,
    skipped: usize,
}

impl Tally {
    fn record(&mut self, global: usize, cost: f64) {
        if !cost.is_finite() {
            self.skipped += 1;
            return;
        }
        self.evaluated += 1;
        if self.best.is_none_or(|best| beats((cost, global), best)) {
            self.best = Some((cost, global));
        }
    }

    fn merge(self, other: Tally) -> Tally {
        let best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(if beats(b, a) { b } else { a }),
            (a, b) => a.or(b),
        };
        Tally {
            best,
            evaluated: self.evaluated + other.evaluated,
            skipped: self.skipped + other.skipped,
        }
    }
}

fn beats((cost, global): (f64, usize), (best_cost, best_global): (f64, usize)) -> bool {
    cost < best_cost || (cost == best_cost && global < best_global)
}

/// Executes a brute-force search.
///
/// # Examples
///
/// ```
/// use u_piecewise::fit::{MseObjective, Sample, SearchConfig, SearchRunner};
/// use u_piecewise::model::{Interval, Model};
/// use u_piecewise::orchestrator::OrchestratorBuilder;
/// use u_piecewise::params::{ParamGrid, UniformRange};
///
/// #[derive(Default)]
/// struct Line { k: f64, m: f64 }
///
/// impl Model<f64, f64> for Line {
///     fn evaluate(&self, x: &f64) -> f64 { self.k * x + self.m }
/// }
///
/// let grid = ParamGrid::<Line>::new()
///     .with_param("k", UniformRange::new(-2.0, 2.0, 0.5), |l, v| l.k = v)
///     .with_param("m", UniformRange::new(-2.0, 2.0, 0.5), |l, v| l.m = v);
/// let mut orch = OrchestratorBuilder::<f64, f64>::new()
///     .free(Interval::everywhere(), grid)
///     .build()
///     .unwrap();
///
/// let data: Vec<Sample> = (0..5).map(|i| Sample::new(i as f64, 1.5 * i as f64 - 1.0)).collect();
/// let result = SearchRunner::run(&mut orch, &MseObjective::new(data), &SearchConfig::default()).unwrap();
///
/// let best = result.best.unwrap();
/// assert!(best.cost < 1e-12);
/// assert_eq!(best.indices, vec![vec![7, 2]]);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search without progress reporting.
    pub fn run<I, O, F>(
        orch: &mut Orchestrator<I, O>,
        objective: &F,
        config: &SearchConfig,
    ) -> Result<SearchResult, PiecewiseError>
    where
        F: Objective<I, O>,
    {
        Self::run_with_progress(orch, objective, config, &|_, _| {})
    }

    /// Runs the search, calling `progress(done, total)` every
    /// `config.progress_every` combinations.
    ///
    /// In parallel mode `progress` is called from worker threads.
    pub fn run_with_progress<I, O, F>(
        orch: &mut Orchestrator<I, O>,
        objective: &F,
        config: &SearchConfig,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> Result<SearchResult, PiecewiseError>
    where
        F: Objective<I, O>,
    {
        config.validate()?;

        let total = orch.size();
        tracing::debug!(total, parallel = config.parallel, "search started");
        let start = Instant::now();

        let tally = if config.parallel {
            Self::stateless(orch, objective, config, progress)?
        } else {
            Self::sequential(orch, objective, config, progress)
        };

        let best = tally.best.map(|(cost, global)| BestCombination {
            global,
            cost,
            indices: orch.indices_at(global).unwrap_or_default(),
        });
        let result = SearchResult {
            best,
            evaluated: tally.evaluated,
            skipped: tally.skipped,
        };

        tracing::info!(
            evaluated = result.evaluated,
            skipped = result.skipped,
            best_cost = result.best.as_ref().map(|b| b.cost),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );
        Ok(result)
    }

    /// Walks the orchestrator's iterator and maps each snapshot back to
    /// its global index.
    fn sequential<I, O, F>(
        orch: &mut Orchestrator<I, O>,
        objective: &F,
        config: &SearchConfig,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> Tally
    where
        F: Objective<I, O>,
    {
        let total = orch.size();
        let mut tally = Tally::default();
        let mut reported = 0;

        orch.reset();
        while let Some(model) = orch.next() {
            let cost = objective.cost(&model);
            // a snapshot always exists right after a successful next()
            if let Some(global) = orch.snapshot().and_then(|s| orch.global_of(s)) {
                tally.record(global, cost);
            }

            if config.progress_every > 0 {
                let done = orch.step();
                if done / config.progress_every > reported / config.progress_every {
                    progress(done, total);
                }
                reported = done;
            }
        }
        let steps = orch.step();
        // trailing combinations that failed to build never reach the loop body
        if config.progress_every > 0 && steps / config.progress_every > reported / config.progress_every {
            progress(steps, total);
        }
        tally.skipped += steps.saturating_sub(tally.evaluated + tally.skipped);
        tally
    }

    /// Decodes contiguous chunks of `[0, total)` with
    /// [`Orchestrator::make_at`].
    #[cfg(feature = "parallel")]
    fn stateless<I, O, F>(
        orch: &Orchestrator<I, O>,
        objective: &F,
        config: &SearchConfig,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> Result<Tally, PiecewiseError>
    where
        F: Objective<I, O>,
    {
        let counter = AtomicUsize::new(0);
        let sweep = || {
            let workers = rayon::current_num_threads();
            chunks(orch.size(), workers, config.min_chunk)
                .into_par_iter()
                .map(|range| scan(orch, objective, range, config, &counter, progress))
                .reduce(Tally::default, Tally::merge)
        };

        if config.workers == 0 {
            return Ok(sweep());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|e| PiecewiseError::InvalidConfig(e.to_string()))?;
        Ok(pool.install(sweep))
    }

    #[cfg(not(feature = "parallel"))]
    fn stateless<I, O, F>(
        orch: &Orchestrator<I, O>,
        objective: &F,
        config: &SearchConfig,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> Result<Tally, PiecewiseError>
    where
        F: Objective<I, O>,
    {
        let counter = AtomicUsize::new(0);
        Ok(chunks(orch.size(), 1, config.min_chunk)
            .into_iter()
            .map(|range| scan(orch, objective, range, config, &counter, progress))
            .fold(Tally::default(), Tally::merge))
    }
}

fn scan<I, O, F>(
    orch: &Orchestrator<I, O>,
    objective: &F,
    range: Range<usize>,
    config: &SearchConfig,
    counter: &AtomicUsize,
    progress: &(dyn Fn(usize, usize) + Sync),
) -> Tally
where
    F: Objective<I, O>,
{
    let total = orch.size();
    let mut tally = Tally::default();
    for global in range {
        match orch.try_make_at(global) {
            Ok(model) => tally.record(global, objective.cost(&model)),
            Err(err) => {
                tracing::warn!(global, error = %err, "skipping combination");
                tally.skipped += 1;
            }
        }
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if config.progress_every > 0 && done % config.progress_every == 0 {
            progress(done, total);
        }
    }
    tally
}

/// Splits `[0, total)` into about four chunks per worker, each at least
/// `min_chunk` long.
fn chunks(total: usize, workers: usize, min_chunk: usize) -> Vec<Range<usize>> {
    let target = total.div_ceil(workers.max(1) * 4);
    let len = target.max(min_chunk).max(1);
    (0..total)
        .step_by(len)
        .map(|start| start..(start + len).min(total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{MseObjective, Sample};
    use crate::model::{DomainHandle, Interval, Model, ModelHandle, PiecewiseModel};
    use crate::search::IndexStrategy;
    use crate::segment::{CursorState, FreeSegment, Segment};
    use crate::orchestrator::OrchestratorBuilder;
    use crate::params::{ParamGrid, UniformRange};
    use std::sync::Mutex;

    #[derive(Debug, Default, Clone)]
    struct Line {
        k: f64,
        m: f64,
    }

    impl Model<f64, f64> for Line {
        fn evaluate(&self, x: &f64) -> f64 {
            self.k * x + self.m
        }
    }

    fn line_grid() -> ParamGrid<Line> {
        ParamGrid::new()
            .with_param("k", UniformRange::new(-2.0, 2.0, 0.5), |l: &mut Line, v| l.k = v)
            .with_param("m", UniformRange::new(-2.0, 2.0, 0.5), |l: &mut Line, v| l.m = v)
    }

    /// A hinge: slope 1 below zero, slope -1 above, both through (0, 1).
    fn hinge_data() -> Vec<Sample> {
        (-4..=4)
            .map(|i| {
                let x = i as f64 * 0.5;
                Sample::new(x, 1.0 - x.abs())
            })
            .collect()
    }

    fn hinge_orchestrator() -> Orchestrator<f64, f64> {
        OrchestratorBuilder::new()
            .free_named("left", Interval::below(0.0), line_grid())
            .free_named("right", Interval::at_or_above(0.0), line_grid())
            .build()
            .unwrap()
    }

    #[test]
    fn test_sequential_finds_hinge() {
        let mut orch = hinge_orchestrator();
        let objective = MseObjective::new(hinge_data());
        let result = SearchRunner::run(&mut orch, &objective, &SearchConfig::sequential()).unwrap();

        let best = result.best.unwrap();
        assert!(best.cost < 1e-12);
        // k = 1 at index 6, m = 1 at index 6; k = -1 at index 2
        assert_eq!(best.indices, vec![vec![6, 6], vec![2, 6]]);
        assert_eq!(result.evaluated + result.skipped, orch.size());

        let model = orch.make_at(best.global).unwrap();
        assert!((model.evaluate(&-1.0) - 0.0).abs() < 1e-12);
        assert!((model.evaluate(&0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let objective = MseObjective::new(hinge_data());

        let mut orch = hinge_orchestrator();
        let seq = SearchRunner::run(&mut orch, &objective, &SearchConfig::sequential()).unwrap();
        let par = SearchRunner::run(
            &mut orch,
            &objective,
            &SearchConfig::default().with_min_chunk(7),
        )
        .unwrap();

        assert_eq!(seq.best, par.best);
        assert_eq!(seq.evaluated, par.evaluated);
        assert_eq!(seq.skipped, par.skipped);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_dedicated_pool() {
        let objective = MseObjective::new(hinge_data());
        let mut orch = hinge_orchestrator();
        let config = SearchConfig::default().with_workers(2).with_min_chunk(16);
        let result = SearchRunner::run(&mut orch, &objective, &config).unwrap();
        assert!(result.best.unwrap().cost < 1e-12);
    }

    #[test]
    fn test_ties_go_to_lowest_global() {
        let mut orch = OrchestratorBuilder::<f64, f64>::new()
            .free(Interval::everywhere(), line_grid())
            .build()
            .unwrap();
        let flat = |_: &PiecewiseModel<f64, f64>| 1.0;

        for config in [SearchConfig::sequential(), SearchConfig::default().with_min_chunk(3)] {
            let result = SearchRunner::run(&mut orch, &flat, &config).unwrap();
            assert_eq!(result.best.unwrap().global, 0);
        }
    }

    #[test]
    fn test_non_finite_costs_are_skipped() {
        let mut orch = OrchestratorBuilder::<f64, f64>::new()
            .free(Interval::everywhere(), line_grid())
            .build()
            .unwrap();
        let total = orch.size();
        let nan = |_: &PiecewiseModel<f64, f64>| f64::NAN;

        for config in [SearchConfig::sequential(), SearchConfig::default()] {
            let result = SearchRunner::run(&mut orch, &nan, &config).unwrap();
            assert!(result.best.is_none());
            assert_eq!(result.evaluated, 0);
            assert_eq!(result.skipped, total);
        }
    }

    #[test]
    fn test_empty_space() {
        let mut orch = OrchestratorBuilder::<f64, f64>::new()
            .free(
                Interval::everywhere(),
                ParamGrid::new().with_param(
                    "k",
                    UniformRange::new(0.0, 1.0, -1.0),
                    |l: &mut Line, v| l.k = v,
                ),
            )
            .build()
            .unwrap();
        let objective = MseObjective::new(hinge_data());
        for config in [SearchConfig::sequential(), SearchConfig::default()] {
            let result = SearchRunner::run(&mut orch, &objective, &config).unwrap();
            assert_eq!(result.best, None);
            assert_eq!(result.evaluated + result.skipped, 0);
        }
    }

    /// Builds only the first `keep` locals of its grid.
    struct Truncated {
        inner: FreeSegment<Line, f64, f64>,
        keep: usize,
    }

    impl Segment<f64, f64> for Truncated {
        fn name(&self) -> &str {
            self.inner.name()
        }
        fn domain(&self) -> DomainHandle<f64> {
            self.inner.domain()
        }
        fn bases(&self) -> Vec<usize> {
            self.inner.bases()
        }
        fn is_constrained(&self) -> bool {
            false
        }
        fn set_strategy(&mut self, strategy: Box<dyn IndexStrategy>) {
            self.inner.set_strategy(strategy)
        }
        fn reset(&mut self) {
            self.inner.reset()
        }
        fn advance(&mut self) -> bool {
            self.inner.advance()
        }
        fn state(&self) -> CursorState {
            self.inner.state()
        }
        fn current_index(&self) -> Option<&[usize]> {
            self.inner.current_index()
        }
        fn current_local(&self) -> Option<usize> {
            self.inner.current_local()
        }
        fn build_at(
            &self,
            local: usize,
            built: &[Option<ModelHandle<f64, f64>>],
            position: usize,
        ) -> Option<ModelHandle<f64, f64>> {
            if local >= self.keep {
                return None;
            }
            self.inner.build_at(local, built, position)
        }
        fn for_each_param_at(&self, local: usize, f: &mut dyn FnMut(&str, usize, String)) {
            self.inner.for_each_param_at(local, f)
        }
    }

    #[test]
    fn test_progress_reported_past_trailing_skips() {
        // 81 combinations, the last 11 fail to build
        let objective = MseObjective::new(hinge_data());

        for config in [
            SearchConfig::sequential().with_progress_every(25),
            SearchConfig::default().with_progress_every(25).with_min_chunk(9),
        ] {
            let mut orch = OrchestratorBuilder::<f64, f64>::new()
                .segment(Box::new(Truncated {
                    inner: FreeSegment::new(Interval::everywhere(), line_grid()),
                    keep: 70,
                }))
                .build()
                .unwrap();
            let calls = Mutex::new(Vec::new());
            let result = SearchRunner::run_with_progress(&mut orch, &objective, &config, &|done, _| {
                calls.lock().unwrap().push(done);
            })
            .unwrap();

            assert_eq!(result.evaluated, 70);
            assert_eq!(result.skipped, 11);
            let mut calls = calls.into_inner().unwrap();
            calls.sort_unstable();
            if config.parallel {
                assert_eq!(calls, vec![25, 50, 75]);
            } else {
                assert_eq!(calls, vec![25, 50, 81]);
            }
        }
    }

    #[test]
    fn test_progress_reporting() {
        let objective = MseObjective::new(hinge_data());
        let mut orch = hinge_orchestrator();
        let total = orch.size();

        for config in [
            SearchConfig::sequential().with_progress_every(1000),
            SearchConfig::default().with_progress_every(1000),
        ] {
            let calls = Mutex::new(Vec::new());
            SearchRunner::run_with_progress(&mut orch, &objective, &config, &|done, all| {
                calls.lock().unwrap().push((done, all));
            })
            .unwrap();

            let mut calls = calls.into_inner().unwrap();
            calls.sort_unstable();
            let expected: Vec<_> = (1..=total / 1000).map(|k| (k * 1000, total)).collect();
            assert_eq!(calls, expected);
        }
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut orch = hinge_orchestrator();
        let objective = MseObjective::new(hinge_data());
        let config = SearchConfig::default().with_min_chunk(0);
        assert!(matches!(
            SearchRunner::run(&mut orch, &objective, &config),
            Err(PiecewiseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_chunks_cover_range() {
        let parts = chunks(10, 1, 3);
        assert_eq!(parts, vec![0..3, 3..6, 6..9, 9..10]);
        assert!(chunks(0, 4, 8).is_empty());

        let covered: usize = chunks(1000, 8, 1).iter().map(|r| r.len()).sum();
        assert_eq!(covered, 1000);
    }
}
