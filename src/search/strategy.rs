//! Traversal strategies over an [`IndexSpace`].

use super::space::IndexSpace;
use u_numflow::random::{create_rng, shuffle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stateful traversal of a discrete index space.
///
/// Call [`reset`](IndexStrategy::reset) with a space, then call
/// [`next`](IndexStrategy::next) until it returns `None`.
///
/// # Contract
///
/// After `reset(space)`, `next()` returns `Some` exactly `space.total()`
/// times, never repeats a multi-index, and covers the whole space. A
/// strategy that has never been reset yields nothing.
///
/// Implementations must be `Send + Sync` so that segments holding them
/// can be shared across worker threads for stateless decoding.
pub trait IndexStrategy: Send + Sync {
    /// Starts a new traversal of `space`.
    fn reset(&mut self, space: &IndexSpace);

    /// Returns the next multi-index, or `None` once exhausted.
    fn next(&mut self) -> Option<Vec<usize>>;
}

/// Forward mixed-radix enumeration.
///
/// Dimension 0 changes fastest; the carry propagates towards the last
/// dimension.
#[derive(Debug, Clone)]
pub struct ForwardStrategy {
    bases: Vec<usize>,
    current: Vec<usize>,
    first: bool,
    finished: bool,
}

impl ForwardStrategy {
    pub fn new() -> Self {
        Self {
            bases: Vec::new(),
            current: Vec::new(),
            first: false,
            finished: true,
        }
    }
}

impl Default for ForwardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStrategy for ForwardStrategy {
    fn reset(&mut self, space: &IndexSpace) {
        self.bases = space.bases().to_vec();
        self.current = vec![0; self.bases.len()];
        self.first = true;
        self.finished = space.is_empty();
    }

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.finished {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.current.clone());
        }

        for (digit, &base) in self.current.iter_mut().zip(&self.bases) {
            *digit += 1;
            if *digit < base {
                return Some(self.current.clone());
            }
            *digit = 0; // carry
        }

        self.finished = true;
        None
    }
}

/// Reverse enumeration.
///
/// Counts the local ordinal down from `total - 1` to 0 and unranks each
/// value, visiting exactly the points of [`ForwardStrategy`] in reverse.
#[derive(Debug, Clone, Default)]
pub struct ReverseStrategy {
    space: IndexSpace,
    next_local: Option<usize>,
}

impl ReverseStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexStrategy for ReverseStrategy {
    fn reset(&mut self, space: &IndexSpace) {
        self.space = space.clone();
        self.next_local = space.total().checked_sub(1);
    }

    fn next(&mut self) -> Option<Vec<usize>> {
        let local = self.next_local?;
        self.next_local = local.checked_sub(1);
        Some(self.space.unrank(local))
    }
}

/// Seeded random-order enumeration.
///
/// Every reset visits the same permutation of `[0, total)` for a given
/// seed, so carries in the orchestrator's odometer replay consistently.
/// Holds one `usize` per point of the space.
#[derive(Debug, Clone)]
pub struct ShuffledStrategy {
    seed: u64,
    space: IndexSpace,
    order: Vec<usize>,
    pos: usize,
}

impl ShuffledStrategy {
    /// Creates a strategy with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            space: IndexSpace::default(),
            order: Vec::new(),
            pos: 0,
        }
    }

    /// Returns the seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl IndexStrategy for ShuffledStrategy {
    fn reset(&mut self, space: &IndexSpace) {
        self.space = space.clone();
        self.order = (0..space.total()).collect();
        let mut rng = create_rng(self.seed);
        shuffle(&mut self.order, &mut rng);
        self.pos = 0;
    }

    fn next(&mut self) -> Option<Vec<usize>> {
        let local = *self.order.get(self.pos)?;
        self.pos += 1;
        Some(self.space.unrank(local))
    }
}

/// Selects the traversal strategy installed into every segment.
///
/// # Examples
///
/// ```
/// use u_piecewise::search::StrategyKind;
///
/// let mut strategy = StrategyKind::Reverse.build();
/// # let _ = &mut strategy;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyKind {
    /// [`ForwardStrategy`].
    #[default]
    Forward,
    /// [`ReverseStrategy`].
    Reverse,
    /// [`ShuffledStrategy`] with the given seed.
    Shuffled { seed: u64 },
}

impl StrategyKind {
    /// A shuffled strategy with a random seed.
    pub fn shuffled() -> Self {
        StrategyKind::Shuffled {
            seed: rand::random(),
        }
    }

    /// Creates a fresh, unset strategy instance.
    pub fn build(&self) -> Box<dyn IndexStrategy> {
        match *self {
            StrategyKind::Forward => Box::new(ForwardStrategy::new()),
            StrategyKind::Reverse => Box::new(ReverseStrategy::new()),
            StrategyKind::Shuffled { seed } => Box::new(ShuffledStrategy::new(seed)),
        }
    }
}
