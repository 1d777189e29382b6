//! Residual diagnostics for an observed/predicted pair.

use super::autocorrelation::{acf, acf_confidence, pacf, pacf_confidence, AcfMethod};
use super::density::{check_bins, Histogram, KernelDensity};
use super::residual_tests::{ljung_box, LjungBoxResult};
use crate::core::{Series, TimeTable};
use crate::error::{ForecastError, Result};
use crate::utils::metrics::residuals;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Configuration for residual diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Largest lag for the ACF and PACF panels.
    pub lags: usize,
    /// Significance level of the confidence bands.
    pub alpha: f64,
    pub acf_method: AcfMethod,
    /// Histogram bin count (None for automatic).
    pub histogram_bins: Option<usize>,
    /// Grid size of the kernel density estimate.
    pub density_points: usize,
    /// Lags for the Ljung-Box test (None for min(10, n/5)).
    pub ljung_box_lags: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            lags: 25,
            alpha: 0.05,
            acf_method: AcfMethod::Fft,
            histogram_bins: None,
            density_points: 200,
            ljung_box_lags: None,
        }
    }
}

impl DiagnosticsConfig {
    /// Create a config with the given lag count.
    pub fn new(lags: usize) -> Self {
        Self {
            lags,
            ..Default::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_acf_method(mut self, method: AcfMethod) -> Self {
        self.acf_method = method;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    pub fn with_density_points(mut self, points: usize) -> Self {
        self.density_points = points;
        self
    }

    pub fn with_ljung_box_lags(mut self, lags: usize) -> Self {
        self.ljung_box_lags = Some(lags);
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.lags == 0 {
            return Err(ForecastError::InvalidParameter(
                "lags must be positive".to_string(),
            ));
        }
        if let Some(bins) = self.histogram_bins {
            check_bins(bins)?;
        }
        Ok(())
    }
}

/// Everything the residual diagnostic figure shows, as numbers.
///
/// Residuals are `observed - predicted`.
#[derive(Debug, Clone)]
pub struct ResidualDiagnostics {
    pub observed_name: String,
    pub predicted_name: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub observed: Vec<f64>,
    pub predicted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// ACF for lags 0..=acf_lags
    pub acf: Vec<f64>,
    /// Confidence half-width per ACF lag
    pub acf_band: Vec<f64>,
    /// PACF for lags 0..=pacf_lags
    pub pacf: Vec<f64>,
    /// Confidence half-width shared by all PACF lags
    pub pacf_band: f64,
    pub histogram: Histogram,
    /// None when the residuals are constant
    pub density: Option<KernelDensity>,
    pub ljung_box: LjungBoxResult,
    pub alpha: f64,
}

impl ResidualDiagnostics {
    /// Align `observed` and `predicted` by timestamp, drop missing pairs and
    /// diagnose the residuals.
    pub fn compute(observed: &Series, predicted: &Series, config: &DiagnosticsConfig) -> Result<Self> {
        config.validate()?;

        let pair = observed.align(predicted);
        let n = pair.timestamps.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }
        if n < 3 {
            return Err(ForecastError::InsufficientData { needed: 3, got: n });
        }
        let dropped = observed.len().max(predicted.len()) - n;
        if dropped > 0 {
            debug!(dropped, kept = n, "dropped unmatched or missing pairs");
        }

        let residuals = residuals(&pair.left, &pair.right)?;

        let acf_lags = config.lags.min(n - 1);
        if acf_lags < config.lags {
            warn!(requested = config.lags, used = acf_lags, n, "ACF lags clamped to series length");
        }
        let acf_values = acf(&residuals, acf_lags, config.acf_method)?;
        let acf_band = acf_confidence(&acf_values, n, config.alpha);

        let pacf_lags = config.lags.min(n / 2 - 1);
        if pacf_lags < config.lags {
            warn!(requested = config.lags, used = pacf_lags, n, "PACF lags clamped to half the series length");
        }
        let pacf_values = pacf(&residuals, pacf_lags)?;

        let histogram = Histogram::new(&residuals, config.histogram_bins)?;
        let density = match KernelDensity::scott(&residuals, config.density_points) {
            Ok(kde) => Some(kde),
            Err(err) => {
                debug!(error = %err, "skipping residual density");
                None
            }
        };

        let ljung_box = ljung_box(&residuals, config.ljung_box_lags, 0);
        debug!(
            n,
            acf_lags,
            pacf_lags,
            q = ljung_box.statistic,
            p = ljung_box.p_value,
            "computed residual diagnostics"
        );

        Ok(Self {
            observed_name: observed.name().to_string(),
            predicted_name: predicted.name().to_string(),
            timestamps: pair.timestamps,
            observed: pair.left,
            predicted: pair.right,
            residuals,
            acf: acf_values,
            acf_band,
            pacf: pacf_values,
            pacf_band: pacf_confidence(n, config.alpha),
            histogram,
            density,
            ljung_box,
            alpha: config.alpha,
        })
    }

    /// Diagnose two columns of the same table.
    pub fn from_table(
        table: &TimeTable,
        observed: &str,
        predicted: &str,
        config: &DiagnosticsConfig,
    ) -> Result<Self> {
        Self::compute(&table.series(observed)?, &table.series(predicted)?, config)
    }

    /// Number of complete pairs diagnosed.
    pub fn len(&self) -> usize {
        self.residuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residuals.is_empty()
    }

    /// ACF lags (excluding 0) whose value lies outside the confidence band.
    pub fn significant_acf_lags(&self) -> Vec<usize> {
        self.acf
            .iter()
            .zip(self.acf_band.iter())
            .enumerate()
            .skip(1)
            .filter(|(_, (r, band))| r.abs() > **band)
            .map(|(k, _)| k)
            .collect()
    }

    /// PACF lags (excluding 0) whose value lies outside the confidence band.
    pub fn significant_pacf_lags(&self) -> Vec<usize> {
        self.pacf
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, p)| p.abs() > self.pacf_band)
            .map(|(k, _)| k)
            .collect()
    }
}
