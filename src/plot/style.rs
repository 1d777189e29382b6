//! Explicit figure styling passed to every render call.

use crate::error::{ForecastError, Result};
use plotters::style::RGBColor;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(127, 127, 127);
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Default line colors.
pub const DEFAULT_PALETTE: [Rgb; 10] = [
    Rgb(31, 119, 180),  // blue
    Rgb(255, 127, 14),  // orange
    Rgb(44, 160, 44),   // green
    Rgb(214, 39, 40),   // red
    Rgb(148, 103, 189), // purple
    Rgb(140, 86, 75),   // brown
    Rgb(227, 119, 194), // pink
    Rgb(127, 127, 127), // gray
    Rgb(188, 189, 34),  // olive
    Rgb(23, 190, 207),  // cyan
];

/// Figure-wide style.
///
/// Values are read at render time only; a style can be shared between any
/// number of figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    pub font_family: String,
    /// Panel caption size
    pub title_size: u32,
    /// Tick label and axis description size
    pub label_size: u32,
    /// Series colors, cycled
    pub palette: Vec<Rgb>,
    pub background: Rgb,
    /// Fill color of confidence bands
    pub band_color: Rgb,
    /// Color of zero lines and rug ticks
    pub axis_color: Rgb,
    pub show_grid: bool,
    /// Margin around each panel in pixels
    pub margin: u32,
    pub line_width: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            font_family: "sans-serif".to_string(),
            title_size: 18,
            label_size: 12,
            palette: DEFAULT_PALETTE.to_vec(),
            background: Rgb::WHITE,
            band_color: Rgb(31, 119, 180),
            axis_color: Rgb::BLACK,
            show_grid: true,
            margin: 10,
            line_width: 2,
        }
    }
}

impl PlotStyle {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, title_size: u32, label_size: u32) -> Self {
        self.font_family = family.into();
        self.title_size = title_size;
        self.label_size = label_size;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn with_band_color(mut self, color: Rgb) -> Self {
        self.band_color = color;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_line_width(mut self, width: u32) -> Self {
        self.line_width = width;
        self
    }

    /// Palette color `index`, wrapping around.
    pub fn color(&self, index: usize) -> RGBColor {
        match self.palette.len() {
            0 => DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].into(),
            len => self.palette[index % len].into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "figure size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.title_size == 0 || self.label_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "font sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn title_font(&self) -> (&str, f64) {
        (self.font_family.as_str(), f64::from(self.title_size))
    }

    pub(crate) fn label_font(&self) -> (&str, f64) {
        (self.font_family.as_str(), f64::from(self.label_size))
    }
}

/// Labels for a single-chart figure.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStyle {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            title: None,
            x_label: "time".to_string(),
            y_label: "value".to_string(),
            show_legend: true,
        }
    }
}

impl AxisStyle {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
}
