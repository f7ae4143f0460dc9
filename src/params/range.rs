//! Discretized value sets for a single parameter.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slack applied to `(max - min) / step` before flooring, so that `max`
/// is kept when it sits on the lattice up to rounding error.
const SIZE_TOLERANCE: f64 = 1e-9;

/// A finite, ordered set of values for one parameter.
///
/// `value_at(i)` is defined for `i` in `[0, size())`. A misconfigured
/// range reports `size() == 0`, which empties every grid it belongs to.
pub trait ParamRange: Send + Sync + 'static {
    /// The value type handed to the model setter.
    type Value: Copy + fmt::Display + Send + Sync + 'static;

    /// Number of values in the range.
    fn size(&self) -> usize;

    /// The `index`-th value.
    fn value_at(&self, index: usize) -> Self::Value;

    /// Whether the range has no values.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Scalar types usable in a [`UniformRange`].
///
/// Arithmetic is carried out in `f64`.
pub trait RangeValue: Copy + PartialOrd + fmt::Display + Send + Sync + 'static {
    fn zero() -> Self;
    fn one() -> Self;
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_range_value_float {
    ($($t:ty),*) => {$(
        impl RangeValue for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn to_f64(self) -> f64 { self as f64 }
            fn from_f64(value: f64) -> Self { value as $t }
        }
    )*};
}

macro_rules! impl_range_value_int {
    ($($t:ty),*) => {$(
        impl RangeValue for $t {
            fn zero() -> Self { 0 }
            fn one() -> Self { 1 }
            fn to_f64(self) -> f64 { self as f64 }
            fn from_f64(value: f64) -> Self { value.round() as $t }
        }
    )*};
}

impl_range_value_float!(f32, f64);
impl_range_value_int!(i32, i64, u32, u64, usize);

/// Evenly spaced values `min, min + step, …` up to and including `max`.
///
/// The range is empty when `step <= 0` or `max < min`.
///
/// # Examples
///
/// ```
/// use u_piecewise::params::{ParamRange, UniformRange};
///
/// let r = UniformRange::new(0.0, 1.0, 0.25);
/// assert_eq!(r.size(), 5);
/// assert_eq!(r.value_at(2), 0.5);
///
/// assert_eq!(UniformRange::new(1.0, 0.0, 0.1).size(), 0);
/// assert_eq!(UniformRange::new(0.0, 1.0, 0.0).size(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UniformRange<T> {
    /// First value.
    pub min: T,
    /// Upper bound (inclusive when on the lattice).
    pub max: T,
    /// Distance between consecutive values. Must be positive.
    pub step: T,
}

impl<T: RangeValue> UniformRange<T> {
    pub fn new(min: T, max: T, step: T) -> Self {
        Self { min, max, step }
    }

    /// A range holding the single value `value`.
    pub fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
            step: T::one(),
        }
    }
}

impl<T: RangeValue> ParamRange for UniformRange<T> {
    type Value = T;

    fn size(&self) -> usize {
        if !(self.step > T::zero()) || self.max < self.min {
            return 0;
        }
        let span = (self.max.to_f64() - self.min.to_f64()) / self.step.to_f64();
        if !span.is_finite() || span < 0.0 {
            return 0;
        }
        let steps = (span + SIZE_TOLERANCE).floor();
        // saturate so oversized ranges surface as overflow, not as empty
        if steps >= usize::MAX as f64 {
            return usize::MAX;
        }
        (steps as usize).checked_add(1).unwrap_or(usize::MAX)
    }

    fn value_at(&self, index: usize) -> T {
        T::from_f64(self.min.to_f64() + index as f64 * self.step.to_f64())
    }
}

/// An explicit list of values, visited in the given order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListRange<T> {
    values: Vec<T>,
}

impl<T> ListRange<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl ListRange<f64> {
    /// `steps` log-spaced values between `min` and `max` (inclusive).
    ///
    /// Bounds must be finite and positive with `max >= min`; otherwise
    /// the range is empty. A single step yields `[min]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_piecewise::params::{ListRange, ParamRange};
    ///
    /// let r = ListRange::log_space(0.1, 10.0, 3);
    /// assert_eq!(r.size(), 3);
    /// assert!((r.value_at(1) - 1.0).abs() < 1e-12);
    /// ```
    pub fn log_space(min: f64, max: f64, steps: usize) -> Self {
        let valid = min.is_finite() && max.is_finite() && min > 0.0 && max >= min;
        if !valid || steps == 0 {
            return Self::new(Vec::new());
        }
        if steps == 1 {
            return Self::new(vec![min]);
        }

        let ln_min = min.ln();
        let step = (max.ln() - ln_min) / (steps as f64 - 1.0);
        Self::new((0..steps).map(|i| (ln_min + step * i as f64).exp()).collect())
    }
}

impl<T> ParamRange for ListRange<T>
where
    T: Copy + fmt::Display + Send + Sync + 'static,
{
    type Value = T;

    fn size(&self) -> usize {
        self.values.len()
    }

    fn value_at(&self, index: usize) -> T {
        self.values[index]
    }
}
