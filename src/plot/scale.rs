//! Axis ranges and label helpers shared by the renderers.

use crate::error::ForecastError;
use chrono::{DateTime, Utc};

const TWO_DAYS: f64 = 2.0 * 86_400.0;

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> ForecastError {
    ForecastError::Render(err.to_string())
}

/// Range of the finite values, padded by `pad` of its width on each side.
///
/// Empty or degenerate input is widened so plotters always gets a
/// non-empty interval.
pub(crate) fn data_range<I>(values: I, pad: f64) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return (-1.0, 1.0);
    }
    let width = hi - lo;
    if width <= f64::EPSILON * lo.abs().max(1.0) {
        let half = (lo.abs() * 0.1).max(0.5);
        return (lo - half, hi + half);
    }
    (lo - pad * width, hi + pad * width)
}

/// Timestamps as fractional Unix seconds.
pub(crate) fn time_axis(timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    timestamps
        .iter()
        .map(|ts| ts.timestamp_millis() as f64 / 1000.0)
        .collect()
}

/// Tick label for a Unix-seconds coordinate; sub-daily spans show the time.
pub(crate) fn format_time(x: f64, span: f64) -> String {
    if !x.is_finite() {
        return String::new();
    }
    match DateTime::<Utc>::from_timestamp(x.floor() as i64, 0) {
        Some(ts) if span < TWO_DAYS => ts.format("%Y-%m-%d %H:%M").to_string(),
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Maximal runs of consecutive points whose y value is finite.
pub(crate) fn finite_runs(xs: &[f64], ys: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
