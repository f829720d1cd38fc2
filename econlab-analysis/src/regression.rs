//! Ordinary least squares with one regressor and an intercept.
//!
//! Pure functions: paired samples in, fit out. Closed form:
//! slope = cov(x, y) / var(x), intercept = mean(y) - slope * mean(x).
//! A constant `x` fits the flat line through mean(y).

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("need at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("non-finite value at index {0}")]
    NonFinite(usize),
}

/// A fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination on the training data.
    pub r_squared: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y ~ x` by least squares.
pub fn fit(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(RegressionError::TooFewPoints(n));
    }
    if let Some(i) = x
        .iter()
        .zip(y)
        .position(|(a, b)| !a.is_finite() || !b.is_finite())
    {
        return Err(RegressionError::NonFinite(i));
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }
    let slope = if sxx <= f64::EPSILON * n as f64 * mean_x.abs().max(1.0) {
        0.0
    } else {
        sxy / sxx
    };
    let intercept = mean_y - slope * mean_x;
    let predicted: Vec<f64> = x.iter().map(|xi| intercept + slope * xi).collect();

    Ok(LinearFit {
        slope,
        intercept,
        r_squared: r_squared(y, &predicted),
        n,
    })
}

/// R² = 1 - SS_res / SS_tot.
///
/// Constant `y` has no variance to explain: 1.0 when the prediction is exact,
/// 0.0 otherwise.
pub fn r_squared(y: &[f64], predicted: &[f64]) -> f64 {
    let mean_y = mean(y);
    let ss_res: f64 = y
        .iter()
        .zip(predicted)
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    let ss_tot: f64 = y.iter().map(|a| (a - mean_y).powi(2)).sum();

    if ss_tot < 1e-15 {
        return if ss_res < 1e-15 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// `n` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
