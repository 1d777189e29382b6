//! Sample autocorrelation and partial autocorrelation.
//!
//! Both use the biased estimator: lagged cross-products around the
//! full-sample mean divided by the lag-0 sum of squares.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{mean, quantile_normal};
use rustfft::{num_complex::Complex64, FftPlanner};

/// How the autocovariances are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcfMethod {
    /// Direct O(n * lags) sums.
    #[default]
    Direct,
    /// Zero-padded FFT, O(n log n) regardless of lag count.
    Fft,
}

/// Autocorrelations for lags `0..=max_lag`.
///
/// Lags at or beyond the series length are NaN. A constant series has
/// zero autocorrelation at every positive lag.
pub fn acf(series: &[f64], max_lag: usize, method: AcfMethod) -> Result<Vec<f64>> {
    let n = series.len();
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::MissingValues);
    }

    let m = mean(series);
    let centered: Vec<f64> = series.iter().map(|x| x - m).collect();
    let usable = max_lag.min(n - 1);

    let autocov = match method {
        AcfMethod::Direct => autocovariance_direct(&centered, usable),
        AcfMethod::Fft => autocovariance_fft(&centered, usable),
    };

    let c0 = autocov[0];
    let mut result: Vec<f64> = if c0 < 1e-12 {
        let mut flat = vec![0.0; usable + 1];
        flat[0] = 1.0;
        flat
    } else {
        autocov.iter().map(|c| c / c0).collect()
    };
    result.resize(max_lag + 1, f64::NAN);
    Ok(result)
}

fn autocovariance_direct(centered: &[f64], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            centered
                .iter()
                .skip(lag)
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
        })
        .collect()
}

fn autocovariance_fft(centered: &[f64], max_lag: usize) -> Vec<f64> {
    let n = centered.len();
    let size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex64> = centered
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
        .take(size)
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(size).process(&mut buffer);
    for value in buffer.iter_mut() {
        *value = Complex64::new(value.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(size).process(&mut buffer);

    // rustfft leaves the inverse unnormalized.
    buffer
        .iter()
        .take(max_lag + 1)
        .map(|c| c.re / size as f64)
        .collect()
}

/// Partial autocorrelations for lags `0..=max_lag`.
///
/// Durbin-Levinson recursion on the biased autocorrelations, which is the
/// Yule-Walker (MLE) estimate. Lag 0 is 1 by convention.
pub fn pacf(series: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let n = series.len();
    if max_lag >= n {
        return Err(ForecastError::InsufficientData {
            needed: max_lag + 1,
            got: n,
        });
    }

    let rho = acf(series, max_lag, AcfMethod::Direct)?;
    let mut result = vec![1.0; max_lag + 1];
    if max_lag == 0 {
        return Ok(result);
    }

    let mut phi = vec![0.0; max_lag + 1];
    let mut prev = vec![0.0; max_lag + 1];
    let mut sigma = 1.0_f64;

    for k in 1..=max_lag {
        let num = rho[k] - (1..k).map(|j| prev[j] * rho[k - j]).sum::<f64>();
        let phi_kk = if sigma.abs() < 1e-12 { 0.0 } else { num / sigma };

        phi[k] = phi_kk;
        for j in 1..k {
            phi[j] = prev[j] - phi_kk * prev[k - j];
        }
        sigma *= 1.0 - phi_kk * phi_kk;
        result[k] = phi_kk;
        prev[..=k].copy_from_slice(&phi[..=k]);
    }

    Ok(result)
}

/// Half-widths of the ACF confidence band at level `1 - alpha`.
///
/// Bartlett's formula: the standard error at lag k is
/// `sqrt((1 + 2 * sum_{j<k} r_j^2) / n)`. Lag 0 has zero width.
pub fn acf_confidence(acf_values: &[f64], n: usize, alpha: f64) -> Vec<f64> {
    let z = quantile_normal(1.0 - alpha / 2.0);
    let mut cumulative = 0.0;
    acf_values
        .iter()
        .enumerate()
        .map(|(k, &r)| {
            let width = if k == 0 {
                0.0
            } else {
                z * ((1.0 + 2.0 * cumulative) / n as f64).sqrt()
            };
            if k > 0 && r.is_finite() {
                cumulative += r * r;
            }
            width
        })
        .collect()
}

/// Half-width of the PACF confidence band at level `1 - alpha`: `z / sqrt(n)`.
pub fn pacf_confidence(n: usize, alpha: f64) -> f64 {
    quantile_normal(1.0 - alpha / 2.0) / (n as f64).sqrt()
}
