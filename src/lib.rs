//! # forecast-diagnostics
//!
//! Companion utilities for evaluating forecasts of time series.
//!
//! Provides accuracy metrics (MAE, MSE, RMSE, MAPE), regular time-index
//! reindexing, residual diagnostics (ACF, PACF, distribution, Ljung-Box)
//! with an SVG diagnostic figure, grouped summaries and derived columns over
//! time-indexed tables, and CSV import/export. Model fitting is left to
//! other libraries; everything here consumes observed and predicted values.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod io;
pub mod plot;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Frequency, Series, TimeTable, TimeTableBuilder};
    pub use crate::error::{ForecastError, Result};
    pub use crate::io::{read_csv, read_csv_path, write_csv, CsvOptions};
    pub use crate::plot::{plot_residuals, render_residual_diagnostics, render_table, AxisStyle, PlotStyle};
    pub use crate::transform::{compute, group_by, reindex, Step};
    pub use crate::utils::{accuracy, mae, mape, mase, mse, rmse, AccuracyMetrics};
    pub use crate::validation::{DiagnosticsConfig, ResidualDiagnostics};
}
