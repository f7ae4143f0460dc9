//! Parameter grids: ranges bound to the fields of a model.

use super::range::ParamRange;
use crate::search::IndexSpace;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Describes one grid dimension, as seen by [`ParamGrid::for_each_param`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMeta<'a> {
    /// Label, if the parameter was registered with one.
    pub label: Option<&'a str>,
    /// Position of the parameter in the grid.
    pub index: usize,
    /// Number of values in the parameter's range.
    pub size: usize,
}

/// A range bound to a model field, with its value type erased.
trait ParamBinding<M>: Send + Sync {
    fn label(&self) -> Option<&str>;
    fn size(&self) -> usize;
    fn apply(&self, model: &mut M, ordinal: usize);
    fn display_at(&self, ordinal: usize) -> String;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

type Setter<M, V> = Box<dyn Fn(&mut M, V) + Send + Sync>;

struct Bound<M, R: ParamRange> {
    label: Option<String>,
    range: R,
    setter: Setter<M, R::Value>,
}

impl<M: 'static, R: ParamRange> ParamBinding<M> for Bound<M, R> {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn size(&self) -> usize {
        self.range.size()
    }

    fn apply(&self, model: &mut M, ordinal: usize) {
        (self.setter)(model, self.range.value_at(ordinal));
    }

    fn display_at(&self, ordinal: usize) -> String {
        self.range.value_at(ordinal).to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Cartesian product of parameter ranges bound to the fields of `M`.
///
/// Each dimension pairs a [`ParamRange`] with a setter closure that
/// writes the chosen value into a model. Dimensions are ordered as they
/// are added; dimension 0 varies fastest during enumeration.
///
/// Labels are resolved at runtime through a string-keyed table. When a
/// label is registered twice, lookups resolve to the first dimension.
///
/// A grid with no dimensions has size 1 and builds `M::default()`.
///
/// # Examples
///
/// ```
/// use u_piecewise::params::{ParamGrid, UniformRange};
///
/// #[derive(Default)]
/// struct Line { k: f64, m: f64 }
///
/// let grid = ParamGrid::<Line>::new()
///     .with_param("k", UniformRange::new(-1.0, 1.0, 0.5), |l, v| l.k = v)
///     .with_param("m", UniformRange::new(0.0, 1.0, 1.0), |l, v| l.m = v);
///
/// assert_eq!(grid.size(), 10);
/// let line = grid.make_model(&[4, 1]);
/// assert_eq!((line.k, line.m), (1.0, 1.0));
/// ```
pub struct ParamGrid<M> {
    params: Vec<Box<dyn ParamBinding<M>>>,
    labels: HashMap<String, usize>,
}

impl<M: 'static> ParamGrid<M> {
    /// Creates a grid with no dimensions.
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            labels: HashMap::new(),
        }
    }

    /// Adds a labelled dimension.
    pub fn with_param<R, F>(mut self, label: impl Into<String>, range: R, setter: F) -> Self
    where
        R: ParamRange,
        F: Fn(&mut M, R::Value) + Send + Sync + 'static,
    {
        self.push_param(Some(label.into()), range, setter);
        self
    }

    /// Adds a dimension without a label.
    pub fn with_unnamed<R, F>(mut self, range: R, setter: F) -> Self
    where
        R: ParamRange,
        F: Fn(&mut M, R::Value) + Send + Sync + 'static,
    {
        self.push_param(None, range, setter);
        self
    }

    /// Adds a dimension and returns its position.
    pub fn push_param<R, F>(&mut self, label: Option<String>, range: R, setter: F) -> usize
    where
        R: ParamRange,
        F: Fn(&mut M, R::Value) + Send + Sync + 'static,
    {
        let index = self.params.len();
        if let Some(ref l) = label {
            self.labels.entry(l.clone()).or_insert(index);
        }
        self.params.push(Box::new(Bound {
            label,
            range,
            setter: Box::new(setter),
        }));
        index
    }

    /// Number of dimensions.
    pub fn dims(&self) -> usize {
        self.params.len()
    }

    /// Per-dimension range sizes.
    pub fn bases(&self) -> Vec<usize> {
        self.params.iter().map(|p| p.size()).collect()
    }

    /// The index space spanned by this grid.
    pub fn space(&self) -> IndexSpace {
        IndexSpace::new(self.bases())
    }

    /// Number of parameter combinations (0 if any range is empty).
    pub fn size(&self) -> usize {
        self.space().total()
    }

    /// Position of the first dimension carrying `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Label of the dimension at `index`.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.params.get(index).and_then(|p| p.label())
    }

    /// Typed access to the range at `index`.
    ///
    /// Returns `None` if the position is out of bounds or the range is
    /// not of type `R`.
    pub fn range_at<R: ParamRange>(&self, index: usize) -> Option<&R> {
        let any = self.params.get(index)?.as_any();
        any.downcast_ref::<Bound<M, R>>().map(|b| &b.range)
    }

    /// Mutable typed access to the range at `index`.
    pub fn range_at_mut<R: ParamRange>(&mut self, index: usize) -> Option<&mut R> {
        let any = self.params.get_mut(index)?.as_any_mut();
        any.downcast_mut::<Bound<M, R>>().map(|b| &mut b.range)
    }

    /// Typed access to the range labelled `label`.
    pub fn range<R: ParamRange>(&self, label: &str) -> Option<&R> {
        self.range_at(self.index_of(label)?)
    }

    /// Mutable typed access to the range labelled `label`.
    pub fn range_mut<R: ParamRange>(&mut self, label: &str) -> Option<&mut R> {
        let index = self.index_of(label)?;
        self.range_at_mut(index)
    }

    /// Builds a model from one ordinal per dimension.
    ///
    /// Starts from `M::default()` and applies every setter in dimension
    /// order. Components must lie within their range sizes.
    pub fn make_model(&self, index: &[usize]) -> M
    where
        M: Default,
    {
        debug_assert_eq!(index.len(), self.params.len(), "multi-index arity");
        let mut model = M::default();
        for (param, &ordinal) in self.params.iter().zip(index) {
            param.apply(&mut model, ordinal);
        }
        model
    }

    /// Builds a model from a local ordinal (dimension 0 fastest).
    pub fn make_model_at(&self, local: usize) -> M
    where
        M: Default,
    {
        self.make_model(&self.space().unrank(local))
    }

    /// Calls `f` once per dimension, in order.
    pub fn for_each_param(&self, mut f: impl FnMut(ParamMeta<'_>)) {
        for (index, param) in self.params.iter().enumerate() {
            f(ParamMeta {
                label: param.label(),
                index,
                size: param.size(),
            });
        }
    }

    /// Reports `(label, position, value)` for each dimension of `index`.
    ///
    /// Unlabelled dimensions report an empty label.
    pub fn describe(&self, index: &[usize], f: &mut dyn FnMut(&str, usize, String)) {
        for (pos, (param, &ordinal)) in self.params.iter().zip(index).enumerate() {
            f(param.label().unwrap_or(""), pos, param.display_at(ordinal));
        }
    }
}

impl<M: 'static> Default for ParamGrid<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for ParamGrid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamGrid")
            .field(
                "params",
                &self
                    .params
                    .iter()
                    .map(|p| (p.label().unwrap_or("").to_string(), p.size()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ListRange, UniformRange};

    #[derive(Debug, Default, PartialEq)]
    struct Parabola {
        a: f64,
        b: f64,
        c: f64,
        degree: i32,
    }

    fn parabola_grid() -> ParamGrid<Parabola> {
        ParamGrid::new()
            .with_param("a", UniformRange::new(0.0, 1.0, 0.5), |p: &mut Parabola, v| p.a = v)
            .with_param("b", ListRange::new(vec![-1.0, 1.0]), |p: &mut Parabola, v| p.b = v)
            .with_unnamed(UniformRange::fixed(3.0), |p: &mut Parabola, v| p.c = v)
            .with_param("degree", UniformRange::new(1, 2, 1), |p: &mut Parabola, v| p.degree = v)
    }

    #[test]
    fn test_size_is_product() {
        let grid = parabola_grid();
        assert_eq!(grid.dims(), 4);
        assert_eq!(grid.bases(), vec![3, 2, 1, 2]);
        assert_eq!(grid.size(), 12);
    }

    #[test]
    fn test_unit_grid() {
        let grid = ParamGrid::<Parabola>::new();
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.make_model(&[]), Parabola::default());
    }

    #[test]
    fn test_make_model_applies_setters() {
        let grid = parabola_grid();
        let p = grid.make_model(&[2, 1, 0, 1]);
        assert_eq!(p, Parabola { a: 1.0, b: 1.0, c: 3.0, degree: 2 });
    }

    #[test]
    fn test_make_model_at_uses_mixed_radix() {
        let grid = parabola_grid();
        // local 5 = 2 + 1 * 3
        let p = grid.make_model_at(5);
        assert_eq!((p.a, p.b), (1.0, 1.0));
    }

    #[test]
    fn test_degenerate_range_empties_grid() {
        let grid = parabola_grid().with_param("broken", UniformRange::new(1.0, 0.0, 0.1), |_, _| {});
        assert_eq!(grid.size(), 0);
    }

    #[test]
    fn test_label_lookup() {
        let grid = parabola_grid();
        assert_eq!(grid.index_of("b"), Some(1));
        assert_eq!(grid.index_of("missing"), None);
        assert_eq!(grid.label_at(2), None);
        assert_eq!(grid.label_at(3), Some("degree"));
    }

    #[test]
    fn test_first_label_wins() {
        let grid = ParamGrid::<Parabola>::new()
            .with_param("x", UniformRange::fixed(1.0), |p, v| p.a = v)
            .with_param("x", UniformRange::fixed(2.0), |p, v| p.b = v);
        assert_eq!(grid.index_of("x"), Some(0));
    }

    #[test]
    fn test_typed_range_access() {
        let mut grid = parabola_grid();
        assert!(grid.range::<ListRange<f64>>("a").is_none());

        let a = grid.range_mut::<UniformRange<f64>>("a").expect("uniform range");
        a.max = 2.0;
        assert_eq!(grid.bases()[0], 5);

        assert_eq!(grid.range::<ListRange<f64>>("b").map(|r| r.values().len()), Some(2));
        assert!(grid.range_at::<UniformRange<f64>>(9).is_none());
    }

    #[test]
    fn test_describe_reports_labels_and_values() {
        let grid = parabola_grid();
        let mut seen = Vec::new();
        grid.describe(&[1, 0, 0, 0], &mut |label, pos, value| {
            seen.push((label.to_string(), pos, value));
        });
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 0, "0.5".to_string()),
                ("b".to_string(), 1, "-1".to_string()),
                ("".to_string(), 2, "3".to_string()),
                ("degree".to_string(), 3, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_for_each_param_meta() {
        let grid = parabola_grid();
        let mut sizes = Vec::new();
        grid.for_each_param(|meta| sizes.push((meta.index, meta.size, meta.label.is_some())));
        assert_eq!(sizes, vec![(0, 3, true), (1, 2, true), (2, 1, false), (3, 2, true)]);
    }
}
