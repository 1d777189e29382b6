//! SVG rendering of residual diagnostics and tables.
//!
//! Every renderer takes an explicit [`PlotStyle`]; nothing is configured
//! globally.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use forecast_diagnostics::core::Series;
//! use forecast_diagnostics::plot::{plot_residuals, PanelKind, PlotStyle};
//! use forecast_diagnostics::validation::DiagnosticsConfig;
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps: Vec<_> = (0..30).map(|i| base + Duration::days(i)).collect();
//! let observed: Vec<f64> = (0..30).map(|i| 10.0 + (i as f64 * 0.9).sin()).collect();
//! let observed = Series::new("observed", timestamps.clone(), observed).unwrap();
//! let predicted = Series::new("predicted", timestamps, vec![10.0; 30]).unwrap();
//!
//! let style = PlotStyle::default().with_size(900, 700);
//! let figure = plot_residuals(&observed, &predicted, &DiagnosticsConfig::new(12), &style).unwrap();
//! assert_eq!(figure.panels.len(), 5);
//! assert!(figure.panel(PanelKind::Pacf).is_some());
//! ```

mod residuals;
mod scale;
mod series;
mod style;

pub use residuals::{
    plot_residuals, render_residual_diagnostics, DiagnosticFigure, Panel, PanelKind,
};
pub use series::render_table;
pub use style::{AxisStyle, PlotStyle, Rgb, DEFAULT_PALETTE};
