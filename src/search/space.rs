//! Discrete index spaces and mixed-radix ranking.

use crate::error::PiecewiseError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A finite multi-dimensional index space.
///
/// Each dimension `i` holds `bases[i]` ordinals `0..bases[i]`. The space
/// contains `total = ∏ bases[i]` points, which is 0 as soon as any base
/// is 0 and 1 for a space with no dimensions.
///
/// Points are ranked in mixed radix with dimension 0 varying fastest:
/// dimension `i` has weight `bases[0] * … * bases[i-1]`.
///
/// # Examples
///
/// ```
/// use u_piecewise::search::IndexSpace;
///
/// let space = IndexSpace::new(vec![3, 2]);
/// assert_eq!(space.total(), 6);
/// assert_eq!(space.unrank(4), vec![1, 1]);
/// assert_eq!(space.rank(&[1, 1]), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexSpace {
    bases: Vec<usize>,
    total: usize,
}

impl IndexSpace {
    /// Creates a space from per-dimension bases.
    ///
    /// A product that overflows `usize` saturates at `usize::MAX`; use
    /// [`try_new`](Self::try_new) where overflow must be reported.
    pub fn new(bases: Vec<usize>) -> Self {
        let total = product(&bases).unwrap_or(usize::MAX);
        Self { bases, total }
    }

    /// Creates a space, failing if the number of points overflows `usize`.
    pub fn try_new(bases: Vec<usize>) -> Result<Self, PiecewiseError> {
        let total = product(&bases).ok_or(PiecewiseError::SpaceOverflow)?;
        Ok(Self { bases, total })
    }

    /// Per-dimension cardinalities.
    pub fn bases(&self) -> &[usize] {
        &self.bases
    }

    /// Number of dimensions.
    pub fn dims(&self) -> usize {
        self.bases.len()
    }

    /// Number of points in the space.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the space has no points.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Encodes a multi-index as a single ordinal.
    ///
    /// Returns `None` if the dimension count does not match, a base is 0,
    /// a component is out of bounds, or the ordinal overflows `usize`.
    pub fn rank(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.bases.len() {
            return None;
        }
        let mut linear = 0usize;
        let mut weight = 1usize;
        for (&digit, &base) in index.iter().zip(&self.bases) {
            if base == 0 || digit >= base {
                return None;
            }
            linear = linear.checked_add(digit.checked_mul(weight)?)?;
            weight = weight.saturating_mul(base);
        }
        Some(linear)
    }

    /// Decodes an ordinal into a multi-index by repeated modulo/divide.
    ///
    /// `linear` is expected to be below [`total`](Self::total); larger
    /// values wrap around in the last dimension.
    pub fn unrank(&self, mut linear: usize) -> Vec<usize> {
        self.bases
            .iter()
            .map(|&base| {
                if base == 0 {
                    return 0;
                }
                let digit = linear % base;
                linear /= base;
                digit
            })
            .collect()
    }
}

impl Default for IndexSpace {
    /// The zero-dimensional space with a single point.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn product(bases: &[usize]) -> Option<usize> {
    if bases.contains(&0) {
        return Some(0);
    }
    bases.iter().try_fold(1usize, |acc, &b| acc.checked_mul(b))
}
