//! Kernel density estimation over small AQI samples.

use std::f64::consts::PI;

use crate::analyzers::types::{DensityCurve, DensityPoint};

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (n - 1 denominator). Returns 0.0 for fewer than two values.
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// One-dimensional Gaussian kernel density estimate.
///
/// Bandwidth follows Scott's rule: the kernel standard deviation is the sample
/// standard deviation scaled by `n^(-1/5)`.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Returns `None` when the samples have zero variance or fewer than two
    /// values, since no bandwidth can be derived.
    pub fn new(samples: &[f64]) -> Option<Self> {
        let m = mean(samples);
        let variance = sample_variance(samples, m);
        if variance <= 0.0 || !variance.is_finite() {
            return None;
        }

        let factor = (samples.len() as f64).powf(-0.2);
        Some(Self {
            samples: samples.to_vec(),
            bandwidth: variance.sqrt() * factor,
        })
    }

    pub(crate) fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.samples.len() as f64 * h * (2.0 * PI).sqrt());
        let sum: f64 = self
            .samples
            .iter()
            .map(|xi| {
                let z = (x - xi) / h;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum
    }
}

/// Samples the KDE of `values` at `points` positions spanning `[min, max]`.
pub fn gaussian_kde(values: &[i64], points: usize) -> DensityCurve {
    let samples: Vec<f64> = values.iter().map(|&v| v as f64).collect();

    let Some(kde) = GaussianKde::new(&samples) else {
        return DensityCurve::Degenerate { at: mean(&samples) };
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let points = linspace(min, max, points)
        .into_iter()
        .map(|x| DensityPoint {
            x,
            y: kde.evaluate(x),
        })
        .collect();

    DensityCurve::Smooth { points }
}
