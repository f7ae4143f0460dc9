//! State common to free and constrained segments.

use super::cursor::{Cursor, CursorState};
use crate::model::{Domain, DomainHandle};
use crate::params::ParamGrid;
use crate::search::IndexStrategy;
use std::sync::Arc;

pub(crate) struct SegmentBase<M: 'static, I> {
    pub(crate) name: String,
    pub(crate) domain: DomainHandle<I>,
    pub(crate) grid: ParamGrid<M>,
    cursor: Cursor,
}

impl<M: 'static, I> SegmentBase<M, I> {
    pub(crate) fn new<D>(domain: D, grid: ParamGrid<M>) -> Self
    where
        D: Domain<I> + 'static,
    {
        Self {
            name: default_name::<M>(),
            domain: Arc::new(domain),
            grid,
            cursor: Cursor::new(),
        }
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() { default_name::<M>() } else { name };
    }

    pub(crate) fn set_strategy(&mut self, strategy: Box<dyn IndexStrategy>) {
        self.cursor.set_strategy(strategy);
    }

    pub(crate) fn reset(&mut self) {
        self.cursor.reset(self.grid.space());
    }

    pub(crate) fn advance(&mut self) -> bool {
        self.cursor.advance()
    }

    pub(crate) fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub(crate) fn current_index(&self) -> Option<&[usize]> {
        self.cursor.current()
    }

    pub(crate) fn current_local(&self) -> Option<usize> {
        self.cursor.local()
    }

    /// Decodes `local`, rejecting ordinals outside the grid.
    pub(crate) fn checked_index(&self, local: usize) -> Option<Vec<usize>> {
        let space = self.grid.space();
        (local < space.total()).then(|| space.unrank(local))
    }

    pub(crate) fn describe(&self, local: usize, f: &mut dyn FnMut(&str, usize, String)) {
        if let Some(index) = self.checked_index(local) {
            self.grid.describe(&index, f);
        }
    }
}

/// The model's type name without its module path.
fn default_name<M>() -> String {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}
