//! Histogram and kernel density estimates of a residual distribution.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{quantile, std_dev};
use std::f64::consts::PI;

/// Upper limit on the number of histogram bins.
pub const MAX_BINS: usize = 1000;

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Equal-width bins covering the data.
    ///
    /// With `bins = None` the count is the larger of Sturges' rule and the
    /// Freedman-Diaconis rule, the latter capped at [`MAX_BINS`]. An explicit
    /// count must lie in `1..=MAX_BINS`.
    pub fn new(values: &[f64], bins: Option<usize>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }
        if let Some(n) = bins {
            check_bins(n)?;
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };

        if !(hi - lo).is_finite() {
            return Err(ForecastError::ComputationError(
                "histogram range overflows".to_string(),
            ));
        }

        let n_bins = bins.unwrap_or_else(|| auto_bins(values, hi - lo));
        let width = (hi - lo) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0; n_bins];
        for &v in values {
            // The last bin is closed on the right.
            let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Counts scaled so the bars integrate to one.
    pub fn density(&self) -> Vec<f64> {
        let total: usize = self.counts.iter().sum();
        let scale = total as f64 * self.width();
        self.counts.iter().map(|&c| c as f64 / scale).collect()
    }
}

pub(crate) fn check_bins(bins: usize) -> Result<()> {
    if bins == 0 || bins > MAX_BINS {
        return Err(ForecastError::InvalidParameter(format!(
            "histogram bins must be in 1..={}, got {}",
            MAX_BINS, bins
        )));
    }
    Ok(())
}

fn auto_bins(values: &[f64], range: f64) -> usize {
    let n = values.len() as f64;
    let sturges = (n.log2().ceil() as usize) + 1;

    let iqr = quantile(values, 0.75) - quantile(values, 0.25);
    let fd = if iqr > 0.0 {
        let width = 2.0 * iqr / n.cbrt();
        // A single outlier against a narrow IQR asks for absurd bin counts.
        (range / width).ceil().min(MAX_BINS as f64) as usize
    } else {
        0
    };

    sturges.max(fd).clamp(1, MAX_BINS)
}

/// Gaussian kernel density estimate evaluated on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelDensity {
    pub bandwidth: f64,
    pub grid: Vec<f64>,
    pub density: Vec<f64>,
}

impl KernelDensity {
    /// Estimate with Scott's bandwidth `sd * n^(-1/5)` on `points` grid
    /// positions spanning the data plus three bandwidths on each side.
    pub fn scott(values: &[f64], points: usize) -> Result<Self> {
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }
        if points < 2 {
            return Err(ForecastError::InvalidParameter(
                "density grid needs at least two points".to_string(),
            ));
        }

        let sd = std_dev(values);
        if !sd.is_finite() || sd <= 0.0 {
            return Err(ForecastError::ComputationError(
                "density of a constant sample is undefined".to_string(),
            ));
        }
        let n = values.len() as f64;
        let bandwidth = sd * n.powf(-0.2);

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min) - 3.0 * bandwidth;
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bandwidth;
        let step = (max - min) / (points - 1) as f64;
        let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

        let grid: Vec<f64> = (0..points).map(|i| min + i as f64 * step).collect();
        let density = grid
            .iter()
            .map(|&x| {
                norm * values
                    .iter()
                    .map(|&v| {
                        let u = (x - v) / bandwidth;
                        (-0.5 * u * u).exp()
                    })
                    .sum::<f64>()
            })
            .collect();

        Ok(Self {
            bandwidth,
            grid,
            density,
        })
    }
}
