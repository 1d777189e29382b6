//! Line plot of every column of a table.

use super::scale::{data_range, finite_runs, format_time, render_err, time_axis};
use super::style::{AxisStyle, PlotStyle};
use crate::core::TimeTable;
use crate::error::{ForecastError, Result};
use plotters::prelude::*;
use tracing::debug;

/// Render all columns of `table` against time as an SVG document.
///
/// Missing values break the line; isolated points are drawn as markers.
pub fn render_table(table: &TimeTable, style: &PlotStyle, axis: &AxisStyle) -> Result<String> {
    style.validate()?;
    if table.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let xs = time_axis(table.timestamps());
    let x_range = data_range(xs.iter().copied(), 0.0);
    let y_range = data_range(
        table.columns().flat_map(|(_, values)| values.iter().copied()),
        0.05,
    );
    let span = x_range.1 - x_range.0;
    let time_label = move |x: &f64| format_time(*x, span);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&RGBColor::from(style.background)).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(style.margin)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = &axis.title {
            builder.caption(title, style.title_font());
        }
        let mut chart = builder
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
            .map_err(render_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(axis.x_label.as_str())
            .y_desc(axis.y_label.as_str())
            .label_style(style.label_font())
            .x_labels(8)
            .x_label_formatter(&time_label);
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_err)?;

        for (i, (name, values)) in table.columns().enumerate() {
            let color = style.color(i);
            let runs = finite_runs(&xs, values);
            let isolated: Vec<(f64, f64)> = runs
                .iter()
                .filter(|run| run.len() == 1)
                .map(|run| run[0])
                .collect();

            chart
                .draw_series(
                    runs.into_iter()
                        .filter(|run| run.len() > 1)
                        .map(|run| PathElement::new(run, color.stroke_width(style.line_width))),
                )
                .map_err(render_err)?
                .label(name)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_series(isolated.into_iter().map(|p| Circle::new(p, 3, color.filled())))
                .map_err(render_err)?;
        }

        if axis.show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(style.label_font())
                .background_style(RGBColor::from(style.background).mix(0.8).filled())
                .border_style(RGBColor::from(style.axis_color).stroke_width(1))
                .draw()
                .map_err(render_err)?;
        }
        root.present().map_err(render_err)?;
    }

    debug!(rows = table.len(), columns = table.width(), "rendered table");
    Ok(svg)
}
