//! Half-open interval domains over scalar inputs.

use super::types::Domain;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The half-open interval `[lower, upper)` with optional bounds.
///
/// Adjacent intervals built from the same breakpoints never overlap and
/// leave no gap, so `below(x1)`, `between(x1, x2)` and `at_or_above(x2)`
/// partition the real line.
///
/// # Examples
///
/// ```
/// use u_piecewise::model::{Domain, Interval};
///
/// let mid = Interval::between(-1.0, 1.0);
/// assert!(mid.accepts(&-1.0));
/// assert!(!mid.accepts(&1.0));
/// assert!(Interval::at_or_above(1.0).accepts(&1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    /// Inclusive lower bound.
    pub lower: Option<f64>,
    /// Exclusive upper bound.
    pub upper: Option<f64>,
}

impl Interval {
    /// `x < upper`.
    pub fn below(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    /// `lower <= x < upper`.
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// `x >= lower`.
    pub fn at_or_above(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// Every input.
    pub fn everywhere() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower.is_none_or(|l| x >= l) && self.upper.is_none_or(|u| x < u)
    }
}

impl Domain<f64> for Interval {
    fn accepts(&self, input: &f64) -> bool {
        self.contains(*input)
    }
}
