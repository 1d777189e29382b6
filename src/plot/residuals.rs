//! Five-panel residual diagnostic figure.

use super::scale::{data_range, format_time, render_err, time_axis};
use super::style::PlotStyle;
use crate::core::Series;
use crate::error::{ForecastError, Result};
use crate::validation::{DiagnosticsConfig, ResidualDiagnostics};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Which diagnostic a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Observed and predicted values over time
    Fit,
    /// Residuals over time
    Residuals,
    /// Histogram, density and rug of the residuals
    Distribution,
    Acf,
    Pacf,
}

/// Handle to one drawn panel.
///
/// Time axes are in Unix seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// A rendered figure and its panels in drawing order.
#[derive(Debug, Clone)]
pub struct DiagnosticFigure {
    pub svg: String,
    pub panels: Vec<Panel>,
}

impl DiagnosticFigure {
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    /// Write the SVG document to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.svg)?;
        Ok(())
    }
}

/// Diagnose `observed - predicted` and render the figure.
pub fn plot_residuals(
    observed: &Series,
    predicted: &Series,
    config: &DiagnosticsConfig,
    style: &PlotStyle,
) -> Result<DiagnosticFigure> {
    let diagnostics = ResidualDiagnostics::compute(observed, predicted, config)?;
    render_residual_diagnostics(&diagnostics, style)
}

/// Render precomputed diagnostics as an SVG figure.
///
/// Layout: observed and predicted on the top row, residuals on the middle
/// row, then distribution, ACF and PACF side by side.
pub fn render_residual_diagnostics(
    diagnostics: &ResidualDiagnostics,
    style: &PlotStyle,
) -> Result<DiagnosticFigure> {
    style.validate()?;
    if diagnostics.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let mut svg = String::new();
    let panels = {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&RGBColor::from(style.background)).map_err(render_err)?;

        let rows = root.split_evenly((3, 1));
        let bottom = rows[2].split_evenly((1, 3));

        let mut pacf_band = vec![diagnostics.pacf_band; diagnostics.pacf.len()];
        pacf_band[0] = 0.0;

        let panels = vec![
            draw_fit(&rows[0], diagnostics, style)?,
            draw_residuals(&rows[1], diagnostics, style)?,
            draw_distribution(&bottom[0], diagnostics, style)?,
            draw_correlogram(
                &bottom[1],
                PanelKind::Acf,
                "Residual ACF",
                &diagnostics.acf,
                &diagnostics.acf_band,
                style,
            )?,
            draw_correlogram(
                &bottom[2],
                PanelKind::Pacf,
                "Residual PACF",
                &diagnostics.pacf,
                &pacf_band,
                style,
            )?,
        ];
        root.present().map_err(render_err)?;
        panels
    };

    debug!(
        n = diagnostics.len(),
        width = style.width,
        height = style.height,
        bytes = svg.len(),
        "rendered residual diagnostics"
    );
    Ok(DiagnosticFigure { svg, panels })
}

fn draw_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x_desc: &str,
    y_desc: &str,
    time_span: Option<f64>,
    style: &PlotStyle,
) -> Result<()> {
    let span = time_span.unwrap_or(0.0);
    let time_label = move |x: &f64| format_time(*x, span);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(style.label_font())
        .x_labels(6)
        .y_labels(6);
    if !style.show_grid {
        mesh.disable_mesh();
    }
    if time_span.is_some() {
        mesh.x_label_formatter(&time_label);
    }
    mesh.draw().map_err(render_err)
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, style: &PlotStyle) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(style.label_font())
        .background_style(RGBColor::from(style.background).mix(0.8).filled())
        .border_style(RGBColor::from(style.axis_color).stroke_width(1))
        .draw()
        .map_err(render_err)
}

fn draw_zero_line<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x_range: (f64, f64),
    style: &PlotStyle,
) -> Result<()> {
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_range.0, 0.0), (x_range.1, 0.0)],
            RGBColor::from(style.axis_color).stroke_width(1),
        )))
        .map_err(render_err)?;
    Ok(())
}

fn draw_fit<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    diagnostics: &ResidualDiagnostics,
    style: &PlotStyle,
) -> Result<Panel> {
    let xs = time_axis(&diagnostics.timestamps);
    let x_range = data_range(xs.iter().copied(), 0.0);
    let y_range = data_range(
        diagnostics.observed.iter().chain(diagnostics.predicted.iter()).copied(),
        0.05,
    );
    let title = format!(
        "{} and {}",
        diagnostics.observed_name, diagnostics.predicted_name
    );

    let mut chart = ChartBuilder::on(area)
        .caption(&title, style.title_font())
        .margin(style.margin)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;
    draw_mesh(&mut chart, "", "value", Some(x_range.1 - x_range.0), style)?;

    let series = [
        (diagnostics.observed_name.as_str(), &diagnostics.observed, style.color(0)),
        (diagnostics.predicted_name.as_str(), &diagnostics.predicted, style.color(1)),
    ];
    for (name, values, color) in series {
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(values.iter().copied()),
                color.stroke_width(style.line_width),
            ))
            .map_err(render_err)?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }
    draw_legend(&mut chart, style)?;

    Ok(Panel {
        kind: PanelKind::Fit,
        title,
        x_range,
        y_range,
    })
}

fn draw_residuals<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    diagnostics: &ResidualDiagnostics,
    style: &PlotStyle,
) -> Result<Panel> {
    let xs = time_axis(&diagnostics.timestamps);
    let x_range = data_range(xs.iter().copied(), 0.0);
    let y_range = data_range(
        diagnostics.residuals.iter().copied().chain(std::iter::once(0.0)),
        0.05,
    );
    let title = "Residuals (observed - predicted)".to_string();

    let mut chart = ChartBuilder::on(area)
        .caption(&title, style.title_font())
        .margin(style.margin)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;
    draw_mesh(&mut chart, "", "residual", Some(x_range.1 - x_range.0), style)?;
    draw_zero_line(&mut chart, x_range, style)?;

    let color = style.color(2);
    chart
        .draw_series(LineSeries::new(
            xs.iter().copied().zip(diagnostics.residuals.iter().copied()),
            color.stroke_width(style.line_width),
        ))
        .map_err(render_err)?;
    chart
        .draw_series(
            xs.iter()
                .zip(diagnostics.residuals.iter())
                .map(|(&x, &r)| Circle::new((x, r), 2, color.filled())),
        )
        .map_err(render_err)?;

    Ok(Panel {
        kind: PanelKind::Residuals,
        title,
        x_range,
        y_range,
    })
}

fn draw_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    diagnostics: &ResidualDiagnostics,
    style: &PlotStyle,
) -> Result<Panel> {
    let histogram = &diagnostics.histogram;
    let heights = histogram.density();

    let kde_x = diagnostics.density.iter().flat_map(|k| k.grid.iter().copied());
    let x_range = data_range(histogram.edges.iter().copied().chain(kde_x), 0.02);
    let kde_y = diagnostics.density.iter().flat_map(|k| k.density.iter().copied());
    let top = heights
        .iter()
        .copied()
        .chain(kde_y)
        .fold(0.0_f64, f64::max);
    let y_range = (0.0, if top > 0.0 { top * 1.1 } else { 1.0 });
    let title = "Residual distribution".to_string();

    let mut chart = ChartBuilder::on(area)
        .caption(&title, style.title_font())
        .margin(style.margin)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;
    draw_mesh(&mut chart, "residual", "density", None, style)?;

    let bar_color = style.color(0);
    chart
        .draw_series(heights.iter().enumerate().map(|(i, &h)| {
            Rectangle::new(
                [(histogram.edges[i], 0.0), (histogram.edges[i + 1], h)],
                bar_color.mix(0.4).filled(),
            )
        }))
        .map_err(render_err)?;

    if let Some(kde) = &diagnostics.density {
        chart
            .draw_series(LineSeries::new(
                kde.grid.iter().copied().zip(kde.density.iter().copied()),
                style.color(1).stroke_width(style.line_width),
            ))
            .map_err(render_err)?;
    }

    let rug = y_range.1 * 0.04;
    let rug_color = RGBColor::from(style.axis_color);
    chart
        .draw_series(
            diagnostics
                .residuals
                .iter()
                .map(|&r| PathElement::new(vec![(r, 0.0), (r, rug)], rug_color.stroke_width(1))),
        )
        .map_err(render_err)?;

    Ok(Panel {
        kind: PanelKind::Distribution,
        title,
        x_range,
        y_range,
    })
}

fn draw_correlogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    kind: PanelKind,
    title: &str,
    values: &[f64],
    band: &[f64],
    style: &PlotStyle,
) -> Result<Panel> {
    let max_lag = values.len().saturating_sub(1);
    let widest = band
        .iter()
        .copied()
        .filter(|b| b.is_finite())
        .fold(0.0_f64, f64::max);
    let limit = (widest * 1.05).max(1.05);
    let x_range = (-0.5, max_lag as f64 + 0.5);
    let y_range = (-limit, limit);

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.title_font())
        .margin(style.margin)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;
    draw_mesh(&mut chart, "lag", "", None, style)?;

    // Shaded band over lags 1..=max_lag
    let lags: Vec<(f64, f64)> = band
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, b)| b.is_finite())
        .map(|(k, &b)| (k as f64, b))
        .collect();
    if !lags.is_empty() {
        let outline: Vec<(f64, f64)> = lags
            .iter()
            .copied()
            .chain(lags.iter().rev().map(|&(k, b)| (k, -b)))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                RGBColor::from(style.band_color).mix(0.2).filled(),
            )))
            .map_err(render_err)?;
    }
    draw_zero_line(&mut chart, x_range, style)?;

    let color = style.color(0);
    let stems: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(k, &v)| (k as f64, v))
        .collect();
    chart
        .draw_series(
            stems
                .iter()
                .map(|&(k, v)| PathElement::new(vec![(k, 0.0), (k, v)], color.stroke_width(style.line_width))),
        )
        .map_err(render_err)?;
    chart
        .draw_series(stems.iter().map(|&(k, v)| Circle::new((k, v), 3, color.filled())))
        .map_err(render_err)?;

    Ok(Panel {
        kind,
        title: title.to_string(),
        x_range,
        y_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Rgb;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn days(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn pair(n: usize) -> (Series, Series) {
        let observed: Vec<f64> = (0..n).map(|i| (i as f64 * 0.4).sin() * 5.0 + i as f64 * 0.1).collect();
        let predicted: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
        (
            Series::new("sales", days(n), observed).unwrap(),
            Series::new("forecast", days(n), predicted).unwrap(),
        )
    }

    #[test]
    fn renders_five_panels_in_order() {
        let (observed, predicted) = pair(60);
        let figure = plot_residuals(
            &observed,
            &predicted,
            &DiagnosticsConfig::default(),
            &PlotStyle::default(),
        )
        .unwrap();

        let kinds: Vec<PanelKind> = figure.panels.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PanelKind::Fit,
                PanelKind::Residuals,
                PanelKind::Distribution,
                PanelKind::Acf,
                PanelKind::Pacf
            ]
        );
        assert!(figure.svg.contains("<svg"));
        assert!(figure.svg.contains("Residual ACF"));
        assert!(figure.svg.contains("sales and forecast"));
    }

    #[test]
    fn panel_ranges_cover_the_data() {
        let (observed, predicted) = pair(40);
        let diag = ResidualDiagnostics::compute(&observed, &predicted, &DiagnosticsConfig::new(10)).unwrap();
        let figure = render_residual_diagnostics(&diag, &PlotStyle::default()).unwrap();

        let fit = figure.panel(PanelKind::Fit).unwrap();
        let first = diag.timestamps[0].timestamp() as f64;
        assert_eq!(fit.x_range.0, first);

        let acf = figure.panel(PanelKind::Acf).unwrap();
        assert_eq!(acf.x_range, (-0.5, 10.5));
        assert!(acf.y_range.1 >= 1.0);

        let resid = figure.panel(PanelKind::Residuals).unwrap();
        for r in &diag.residuals {
            assert!(*r >= resid.y_range.0 && *r <= resid.y_range.1);
        }
    }

    #[test]
    fn style_changes_the_output() {
        let (observed, predicted) = pair(30);
        let diag = ResidualDiagnostics::compute(&observed, &predicted, &DiagnosticsConfig::default()).unwrap();

        let plain = render_residual_diagnostics(&diag, &PlotStyle::default()).unwrap();
        let styled = render_residual_diagnostics(
            &diag,
            &PlotStyle::default()
                .with_size(640, 480)
                .with_background(Rgb(250, 250, 240)),
        )
        .unwrap();

        assert_ne!(plain.svg, styled.svg);
        assert!(styled.svg.contains("640"));
    }

    #[test]
    fn constant_residuals_still_render() {
        let observed = Series::new("y", days(8), vec![3.0; 8]).unwrap();
        let predicted = Series::new("yhat", days(8), vec![2.0; 8]).unwrap();
        let figure = plot_residuals(
            &observed,
            &predicted,
            &DiagnosticsConfig::default(),
            &PlotStyle::default(),
        )
        .unwrap();

        let dist = figure.panel(PanelKind::Distribution).unwrap();
        assert!(dist.x_range.0 < 1.0 && dist.x_range.1 > 1.0);
    }

    #[test]
    fn rejects_invalid_style() {
        let (observed, predicted) = pair(10);
        let result = plot_residuals(
            &observed,
            &predicted,
            &DiagnosticsConfig::default(),
            &PlotStyle::default().with_size(0, 0),
        );
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }
}
