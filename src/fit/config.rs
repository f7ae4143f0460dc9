//! Search configuration.

use crate::error::PiecewiseError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`SearchRunner`](super::SearchRunner).
///
/// # Defaults
///
/// ```
/// use u_piecewise::fit::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert!(config.parallel);
/// assert_eq!(config.workers, 0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_piecewise::fit::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_parallel(true)
///     .with_workers(4)
///     .with_progress_every(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Decode combinations by global index across worker threads.
    ///
    /// When `false` the runner walks the orchestrator sequentially.
    /// Without the `parallel` feature the stateless mode runs on the
    /// calling thread.
    pub parallel: bool,

    /// Number of worker threads. 0 uses the global rayon pool.
    pub workers: usize,

    /// Call the progress callback every this many combinations.
    /// 0 disables progress reporting.
    pub progress_every: usize,

    /// Smallest contiguous block of global indices handed to one worker.
    pub min_chunk: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: 0,
            progress_every: 0,
            min_chunk: 64,
        }
    }
}

impl SearchConfig {
    pub fn sequential() -> Self {
        Self::default().with_parallel(false)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn with_min_chunk(mut self, min_chunk: usize) -> Self {
        self.min_chunk = min_chunk;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PiecewiseError> {
        if self.min_chunk == 0 {
            return Err(PiecewiseError::InvalidConfig(
                "min_chunk must be at least 1".into(),
            ));
        }
        if !self.parallel && self.workers > 0 {
            return Err(PiecewiseError::InvalidConfig(format!(
                "workers = {} requires parallel mode",
                self.workers
            )));
        }
        Ok(())
    }
}
