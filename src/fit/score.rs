//! Objectives scoring a composed model against data.
//!
//! Every objective returns a cost: lower is better. A non-finite cost
//! marks the combination as unusable and the runner skips it.

use crate::model::PiecewiseModel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scores one composed model.
///
/// Called concurrently in parallel search, hence `Sync`. Any
/// `Fn(&PiecewiseModel<I, O>) -> f64` closure is an objective.
pub trait Objective<I, O>: Sync {
    fn cost(&self, model: &PiecewiseModel<I, O>) -> f64;
}

impl<I, O, F> Objective<I, O> for F
where
    F: Fn(&PiecewiseModel<I, O>) -> f64 + Sync,
{
    fn cost(&self, model: &PiecewiseModel<I, O>) -> f64 {
        self(model)
    }
}

/// One observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Mean squared error of `predict` over `samples`. NaN if empty.
pub fn mse(samples: &[Sample], predict: impl Fn(f64) -> f64) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = samples
        .iter()
        .map(|s| {
            let e = predict(s.x) - s.y;
            e * e
        })
        .sum();
    sum / samples.len() as f64
}

/// Pearson correlation coefficient.
///
/// NaN if the lengths differ, there are fewer than two points, or either
/// series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n != ys.len() || n < 2 {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

/// Correlation between `predict(x)` and the observed `y`.
pub fn correlation(samples: &[Sample], predict: impl Fn(f64) -> f64) -> f64 {
    let predicted: Vec<f64> = samples.iter().map(|s| predict(s.x)).collect();
    let observed: Vec<f64> = samples.iter().map(|s| s.y).collect();
    pearson(&predicted, &observed)
}

/// Cost = mean squared error.
#[derive(Debug, Clone, Default)]
pub struct MseObjective {
    samples: Vec<Sample>,
}

impl MseObjective {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl Objective<f64, f64> for MseObjective {
    fn cost(&self, model: &PiecewiseModel<f64, f64>) -> f64 {
        mse(&self.samples, |x| model.evaluate(&x))
    }
}

/// Cost = `1 - r`, so a perfect positive correlation scores 0.
#[derive(Debug, Clone, Default)]
pub struct CorrelationObjective {
    samples: Vec<Sample>,
}

impl CorrelationObjective {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl Objective<f64, f64> for CorrelationObjective {
    fn cost(&self, model: &PiecewiseModel<f64, f64>) -> f64 {
        1.0 - correlation(&self.samples, |x| model.evaluate(&x))
    }
}
