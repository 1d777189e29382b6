//! Residual diagnostics for a naive seasonal forecast.
//!
//! Run with: cargo run --example residual_diagnostics
//! Set RUST_LOG=forecast_diagnostics=debug to see the library's logs.

use chrono::{Duration, TimeZone, Utc};
use forecast_diagnostics::core::Series;
use forecast_diagnostics::plot::{render_residual_diagnostics, PlotStyle};
use forecast_diagnostics::utils::{accuracy, mase};
use forecast_diagnostics::validation::{DiagnosticsConfig, ResidualDiagnostics};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Residual diagnostics ===\n");

    // 1. Four years of monthly data with trend and yearly seasonality
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..48).map(|i| base + Duration::days(30 * i)).collect();
    let observed: Vec<f64> = (0..48)
        .map(|i| {
            200.0                                                           // level
            + 2.0 * i as f64                                                // trend
            + 25.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()   // season
            + 3.0 * ((i * 37) % 11) as f64 / 11.0                           // noise
        })
        .collect();

    // 2. Seasonal naive forecast: last year's value
    let predicted: Vec<f64> = (0..48)
        .map(|i| if i < 12 { f64::NAN } else { observed[i - 12] })
        .collect();

    let observed = Series::new("passengers", timestamps.clone(), observed).unwrap();
    let predicted = Series::new("seasonal naive", timestamps, predicted).unwrap();

    // 3. Accuracy
    let metrics = accuracy(observed.values(), predicted.values()).unwrap();
    println!("Pairs compared: {}", metrics.n);
    println!("MAE:  {:.3}", metrics.mae);
    println!("RMSE: {:.3}", metrics.rmse);
    println!("MAPE: {:.3}%", metrics.mape);
    match mase(observed.values(), predicted.values()) {
        Ok(v) => println!("MASE: {:.3}", v),
        Err(e) => println!("MASE: {}", e),
    }

    // 4. Diagnostics
    let config = DiagnosticsConfig::new(18);
    let diagnostics = ResidualDiagnostics::compute(&observed, &predicted, &config).unwrap();
    println!("\n--- Residuals ---");
    println!(
        "Ljung-Box Q = {:.3} on {} df, p = {:.4}",
        diagnostics.ljung_box.statistic, diagnostics.ljung_box.df, diagnostics.ljung_box.p_value
    );
    println!("Significant ACF lags:  {:?}", diagnostics.significant_acf_lags());
    println!("Significant PACF lags: {:?}", diagnostics.significant_pacf_lags());

    // 5. Figure
    let style = PlotStyle::default().with_size(1400, 1000);
    let figure = render_residual_diagnostics(&diagnostics, &style).unwrap();
    let path = std::env::temp_dir().join("residual_diagnostics.svg");
    figure.save(&path).unwrap();
    println!("\nWrote {} panels to {}", figure.panels.len(), path.display());
}
