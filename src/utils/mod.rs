//! Accuracy metrics and statistical helpers.

pub mod metrics;
pub mod stats;

pub use metrics::{accuracy, mae, mape, mase, mse, residuals, rmse, AccuracyMetrics};
pub use stats::{chi_squared_sf, quantile_normal};
