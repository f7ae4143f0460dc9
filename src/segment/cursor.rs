//! Traversal cursor shared by all segment kinds.

use crate::search::{ForwardStrategy, IndexSpace, IndexStrategy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a segment's cursor in its traversal.
///
/// `Unset → reset → Positioned | Exhausted → advance → Positioned | Exhausted`.
/// `Exhausted` is terminal until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CursorState {
    /// Never reset, or the strategy was replaced since the last reset.
    Unset,
    /// Pointing at a valid variant.
    Positioned,
    /// No variant left.
    Exhausted,
}

pub(crate) struct Cursor {
    space: IndexSpace,
    strategy: Box<dyn IndexStrategy>,
    current: Option<Vec<usize>>,
    state: CursorState,
}

impl Cursor {
    pub(crate) fn new() -> Self {
        Self {
            space: IndexSpace::default(),
            strategy: Box::new(ForwardStrategy::new()),
            current: None,
            state: CursorState::Unset,
        }
    }

    pub(crate) fn set_strategy(&mut self, strategy: Box<dyn IndexStrategy>) {
        self.strategy = strategy;
        self.current = None;
        self.state = CursorState::Unset;
    }

    pub(crate) fn reset(&mut self, space: IndexSpace) {
        self.strategy.reset(&space);
        self.space = space;
        self.current = self.strategy.next();
        self.state = self.positioned_or_exhausted();
    }

    pub(crate) fn advance(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.current = self.strategy.next();
        self.state = self.positioned_or_exhausted();
        self.current.is_some()
    }

    pub(crate) fn state(&self) -> CursorState {
        self.state
    }

    pub(crate) fn current(&self) -> Option<&[usize]> {
        self.current.as_deref()
    }

    pub(crate) fn local(&self) -> Option<usize> {
        self.space.rank(self.current.as_deref()?)
    }

    fn positioned_or_exhausted(&self) -> CursorState {
        if self.current.is_some() {
            CursorState::Positioned
        } else {
            CursorState::Exhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ReverseStrategy;

    #[test]
    fn test_state_machine() {
        let mut cursor = Cursor::new();
        assert_eq!(cursor.state(), CursorState::Unset);
        assert!(!cursor.advance());
        assert_eq!(cursor.local(), None);

        cursor.reset(IndexSpace::new(vec![2]));
        assert_eq!(cursor.state(), CursorState::Positioned);
        assert_eq!(cursor.local(), Some(0));

        assert!(cursor.advance());
        assert_eq!(cursor.local(), Some(1));

        assert!(!cursor.advance());
        assert_eq!(cursor.state(), CursorState::Exhausted);
        assert!(!cursor.advance());
        assert_eq!(cursor.state(), CursorState::Exhausted);

        cursor.reset(IndexSpace::new(vec![2]));
        assert_eq!(cursor.state(), CursorState::Positioned);
    }

    #[test]
    fn test_empty_space_is_exhausted_on_reset() {
        let mut cursor = Cursor::new();
        cursor.reset(IndexSpace::new(vec![0]));
        assert_eq!(cursor.state(), CursorState::Exhausted);
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_replacing_strategy_unsets() {
        let mut cursor = Cursor::new();
        cursor.reset(IndexSpace::new(vec![3]));
        cursor.set_strategy(Box::new(ReverseStrategy::new()));
        assert_eq!(cursor.state(), CursorState::Unset);

        cursor.reset(IndexSpace::new(vec![3]));
        assert_eq!(cursor.local(), Some(2));
    }
}
