//! Accuracy metrics for forecast evaluation.
//!
//! Every metric compares an observed sequence `Y` with a predicted sequence
//! `y` of the same length. Positions where either value is NaN are dropped
//! before comparison.

use crate::error::{ForecastError, Result};
use tracing::debug;

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (non-finite if an observed value is zero)
    pub mape: f64,
    /// Mean Absolute Scaled Error (not implemented, always None)
    pub mase: Option<f64>,
    /// Number of complete pairs the metrics were computed on
    pub n: usize,
}

/// Drop positions where either side is NaN.
///
/// Returns `DimensionMismatch` for unequal lengths.
pub fn complete_pairs(actual: &[f64], predicted: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    Ok(actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| !a.is_nan() && !p.is_nan())
        .map(|(&a, &p)| (a, p))
        .unzip())
}

fn checked_pairs(actual: &[f64], predicted: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let (a, p) = complete_pairs(actual, predicted)?;
    if a.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    Ok((a, p))
}

/// Residuals `actual - predicted` over the complete pairs.
///
/// Note the sign: positive residuals mean the prediction was too low.
///
/// # Example
/// ```
/// use forecast_diagnostics::utils::metrics::residuals;
///
/// let r = residuals(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).unwrap();
/// assert_eq!(r, vec![0.0, 1.0, 2.0]);
/// ```
pub fn residuals(actual: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
    let (a, p) = complete_pairs(actual, predicted)?;
    Ok(a.iter().zip(p.iter()).map(|(a, p)| a - p).collect())
}

/// Mean Absolute Error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (a, p) = checked_pairs(actual, predicted)?;
    Ok(l1_distance(&a, &p) / a.len() as f64)
}

/// Mean Squared Error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (a, p) = checked_pairs(actual, predicted)?;
    Ok(squared_distance(&a, &p) / a.len() as f64)
}

/// Root Mean Squared Error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    mse(actual, predicted).map(f64::sqrt)
}

/// Mean Absolute Percentage Error, in percent.
///
/// A zero observed value makes the result non-finite (inf, or NaN when the
/// prediction is also zero). Callers must filter zeros beforehand.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (a, p) = checked_pairs(actual, predicted)?;
    if a.contains(&0.0) {
        debug!(n = a.len(), "mape over zero observed values is non-finite");
    }
    let sum: f64 = a
        .iter()
        .zip(p.iter())
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Ok(100.0 * sum / a.len() as f64)
}

/// Mean Absolute Scaled Error.
///
/// Not implemented: always returns `ForecastError::NotImplemented`,
/// whatever the input. Notebook-style metric helpers often return a NaN
/// placeholder for MASE instead; code ported from them must handle the
/// error rather than test the value for NaN.
pub fn mase(_actual: &[f64], _predicted: &[f64]) -> Result<f64> {
    Err(ForecastError::NotImplemented("mase"))
}

/// Calculate all accuracy metrics between actual and predicted values.
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    let (a, p) = checked_pairs(actual, predicted)?;
    let dropped = actual.len() - a.len();
    if dropped > 0 {
        debug!(dropped, kept = a.len(), "dropped incomplete pairs");
    }

    let mse = mse(&a, &p)?;
    Ok(AccuracyMetrics {
        mae: mae(&a, &p)?,
        mse,
        rmse: mse.sqrt(),
        mape: mape(&a, &p)?,
        mase: mase(&a, &p).ok(),
        n: a.len(),
    })
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accuracy_perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let metrics = accuracy(&actual, &actual).unwrap();

        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mape, 0.0, epsilon = 1e-10);
        assert_eq!(metrics.n, 5);
    }

    #[test]
    fn accuracy_known_values() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = vec![1.5, 2.5, 2.5, 4.5, 4.5];

        let metrics = accuracy(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 0.5, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.25, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.5, epsilon = 1e-10);
        assert!(metrics.mase.is_none());
    }

    #[test]
    fn rmse_penalizes_large_errors() {
        let actual = vec![0.0, 0.0, 0.0, 0.0];
        let predicted = vec![0.0, 0.0, 0.0, 4.0];
        assert_relative_eq!(mae(&actual, &predicted).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(rmse(&actual, &predicted).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn mape_known_value() {
        // |10/100| and |20/200| -> 10% each
        assert_relative_eq!(
            mape(&[100.0, 200.0], &[110.0, 180.0]).unwrap(),
            10.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn mape_with_zero_observed_is_not_finite() {
        let value = mape(&[0.0, 1.0, 2.0], &[0.1, 1.1, 2.1]).unwrap();
        assert!(value.is_infinite());

        let value = mape(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn mase_is_not_implemented() {
        assert_eq!(
            mase(&[1.0, 2.0], &[1.0, 2.0]),
            Err(ForecastError::NotImplemented("mase"))
        );
        assert_eq!(mase(&[], &[1.0]), Err(ForecastError::NotImplemented("mase")));
    }

    #[test]
    fn missing_pairs_are_dropped() {
        let actual = vec![1.0, f64::NAN, 3.0, 4.0];
        let predicted = vec![2.0, 2.0, f64::NAN, 5.0];

        assert_relative_eq!(mae(&actual, &predicted).unwrap(), 1.0, epsilon = 1e-10);
        assert_eq!(accuracy(&actual, &predicted).unwrap().n, 2);
    }

    #[test]
    fn dimension_mismatch() {
        let result = rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 2 })
        ));
        assert!(residuals(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn empty_data() {
        assert!(matches!(mae(&[], &[]), Err(ForecastError::EmptyData)));
        assert!(matches!(
            accuracy(&[f64::NAN], &[1.0]),
            Err(ForecastError::EmptyData)
        ));
    }

    #[test]
    fn residuals_use_observed_minus_predicted() {
        let r = residuals(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(r, vec![0.0, 1.0, 2.0]);

        let r = residuals(&[1.0, f64::NAN, 3.0], &[2.0, 1.0, 1.0]).unwrap();
        assert_eq!(r, vec![-1.0, 2.0]);
    }
}
