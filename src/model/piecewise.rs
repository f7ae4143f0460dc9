//! Piecewise composition of models.

use super::types::{Domain, Model, Sentinel};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a built model.
pub type ModelHandle<I, O> = Arc<dyn Model<I, O>>;

/// Shared handle to a domain predicate.
pub type DomainHandle<I> = Arc<dyn Domain<I>>;

/// One `(domain, model)` pair of a [`PiecewiseModel`].
pub struct Piece<I, O> {
    pub domain: DomainHandle<I>,
    pub model: ModelHandle<I, O>,
}

impl<I, O> Clone for Piece<I, O> {
    fn clone(&self) -> Self {
        Self {
            domain: Arc::clone(&self.domain),
            model: Arc::clone(&self.model),
        }
    }
}

/// An ordered list of `(domain, model)` pairs evaluated by first match.
///
/// When domains overlap the piece added first wins. An input accepted by
/// no domain evaluates to [`Sentinel::sentinel`] instead of failing.
///
/// # Examples
///
/// ```
/// use u_piecewise::model::{Interval, PiecewiseModel};
///
/// let mut pm: PiecewiseModel<f64, f64> = PiecewiseModel::new();
/// pm.push(Interval::below(0.0), |x: &f64| -x);
/// pm.push(Interval::between(0.0, 10.0), |x: &f64| x * x);
///
/// assert_eq!(pm.evaluate(&-2.0), 2.0);
/// assert_eq!(pm.evaluate(&3.0), 9.0);
/// assert!(pm.evaluate(&10.0).is_nan());
/// ```
pub struct PiecewiseModel<I, O> {
    pieces: Vec<Piece<I, O>>,
}

impl<I, O> PiecewiseModel<I, O> {
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pieces: Vec::with_capacity(capacity),
        }
    }

    /// Appends a piece built from owned values.
    pub fn push<D, M>(&mut self, domain: D, model: M)
    where
        D: Domain<I> + 'static,
        M: Model<I, O> + 'static,
    {
        self.push_shared(Arc::new(domain), Arc::new(model));
    }

    /// Appends a piece from shared handles.
    pub fn push_shared(&mut self, domain: DomainHandle<I>, model: ModelHandle<I, O>) {
        self.pieces.push(Piece { domain, model });
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[Piece<I, O>] {
        &self.pieces
    }

    /// The model of the piece at `index`.
    pub fn model_at(&self, index: usize) -> Option<&ModelHandle<I, O>> {
        self.pieces.get(index).map(|p| &p.model)
    }

    /// Position of the first piece whose domain accepts `input`.
    pub fn locate(&self, input: &I) -> Option<usize> {
        self.pieces.iter().position(|p| p.domain.accepts(input))
    }

    /// Evaluates the first piece accepting `input`, or the sentinel.
    ///
    /// Custom output types need a [`Sentinel`] impl, usually through
    /// [`impl_sentinel_default!`](crate::impl_sentinel_default).
    pub fn evaluate(&self, input: &I) -> O
    where
        O: Sentinel,
    {
        match self.locate(input) {
            Some(i) => self.pieces[i].model.evaluate(input),
            None => O::sentinel(),
        }
    }
}

impl<I, O> Default for PiecewiseModel<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> Clone for PiecewiseModel<I, O> {
    fn clone(&self) -> Self {
        Self {
            pieces: self.pieces.clone(),
        }
    }
}

impl<I, O> fmt::Debug for PiecewiseModel<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseModel")
            .field("pieces", &self.pieces.len())
            .finish()
    }
}

impl<I, O: Sentinel> Model<I, O> for PiecewiseModel<I, O> {
    fn evaluate(&self, input: &I) -> O {
        PiecewiseModel::evaluate(self, input)
    }
}
