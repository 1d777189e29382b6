//! Residual diagnostics: autocorrelation, distribution and portmanteau tests.
//!
//! # Example
//!
//! ```
//! use forecast_diagnostics::validation::{acf, durbin_watson, ljung_box, AcfMethod};
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, Some(5), 0);
//! if lb.is_white_noise(0.05) {
//!     println!("Residuals pass Ljung-Box test");
//! }
//!
//! let r = acf(&residuals, 3, AcfMethod::Direct).unwrap();
//! assert_eq!(r[0], 1.0);
//! println!("Durbin-Watson statistic: {}", durbin_watson(&residuals).statistic);
//! ```

pub mod autocorrelation;
pub mod density;
pub mod diagnostics;

pub use autocorrelation::{acf, acf_confidence, pacf, pacf_confidence, AcfMethod};
pub use density::{Histogram, KernelDensity, MAX_BINS};
pub use diagnostics::{DiagnosticsConfig, ResidualDiagnostics};
pub use residual_tests::{
    durbin_watson, ljung_box, AutocorrelationType, DurbinWatsonResult, LjungBoxResult,
};
