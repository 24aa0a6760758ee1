//! Figure canvas shared by the static dashboards.
//!
//! A [`FigureBuilder`] owns everything a dashboard needs before the first
//! pixel is drawn: the output location, the resolution, the resolved style
//! sheet and the figure title.  [`FigureBuilder::render`] then lays out the
//! canonical 2x2 panel grid and hands the panels to a drawing callback.

use std::fs;
use std::path::PathBuf;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::RenderConfig;
use crate::error::{Result, VizError};
use crate::fonts::{install_chart_fonts, CHART_FONT_FAMILY};
use crate::style::StyleSheet;

/// One cell of the dashboard grid.
pub type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const POINTS_PER_INCH: f64 = 72.0;
const TITLE_POINTS: f64 = 16.0;
const FIGURE_PADDING_POINTS: f64 = 6.0;

/// Resolution and style shared by every panel of one figure.
#[derive(Clone, Copy, Debug)]
pub struct Canvas {
    pub dpi: u32,
    pub style: &'static StyleSheet,
}

impl Canvas {
    pub fn new(dpi: u32, style: &'static StyleSheet) -> Self {
        Self { dpi, style }
    }

    /// Converts a length in typographic points into pixels.
    pub fn px(&self, points: f64) -> u32 {
        (points * f64::from(self.dpi) / POINTS_PER_INCH).round().max(1.0) as u32
    }

    /// Same as [`Canvas::px`] for APIs that take signed offsets.
    pub fn offset(&self, points: f64) -> i32 {
        (points * f64::from(self.dpi) / POINTS_PER_INCH).round() as i32
    }

    /// Regular chart text at `points`, in the style's text color.
    pub fn text(&self, points: f64) -> TextStyle<'static> {
        self.text_colored(points, self.style.text)
    }

    pub fn text_colored(&self, points: f64, color: RGBColor) -> TextStyle<'static> {
        (CHART_FONT_FAMILY, f64::from(self.px(points)))
            .into_font()
            .color(&color)
    }

    /// Bold chart text at `points`.
    pub fn bold(&self, points: f64) -> TextStyle<'static> {
        (CHART_FONT_FAMILY, f64::from(self.px(points)), FontStyle::Bold)
            .into_font()
            .color(&self.style.text)
    }

    /// Stroke width for lines drawn `points` wide.
    pub fn stroke(&self, points: f64) -> u32 {
        self.px(points)
    }
}

/// Builder for a titled 2x2 dashboard written to a PNG file.
pub struct FigureBuilder<'c> {
    config: &'c RenderConfig,
    style: &'static StyleSheet,
    title: String,
}

impl<'c> FigureBuilder<'c> {
    /// Creates a builder using the output settings in `config`.
    pub fn new(config: &'c RenderConfig, style: &'static StyleSheet) -> Self {
        Self {
            config,
            style,
            title: String::new(),
        }
    }

    /// Sets the figure title drawn above the grid.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Draws the figure into `file_name` inside the output directory.
    ///
    /// `draw` receives the four panels in row-major order.
    pub fn render<F>(self, file_name: &str, draw: F) -> Result<PathBuf>
    where
        F: for<'a> FnOnce(&Canvas, &[Panel<'a>; 4]) -> Result<()>,
    {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|err| VizError::io(output_dir, err))?;
        install_chart_fonts()?;

        let canvas = Canvas::new(self.config.dpi, self.style);
        let path = self.config.output_path(file_name);
        {
            let root = BitMapBackend::new(&path, self.config.canvas_size()).into_drawing_area();
            root.fill(&self.style.background)?;

            let padding = canvas.px(FIGURE_PADDING_POINTS);
            let body = if self.title.is_empty() {
                root.margin(padding, padding, padding, padding)
            } else {
                root.titled(&self.title, canvas.bold(TITLE_POINTS))?
                    .margin(padding, padding, padding, padding)
            };

            let panels: [Panel<'_>; 4] = body
                .split_evenly((2, 2))
                .try_into()
                .map_err(|_| VizError::Drawing("figure grid must have four panels".to_owned()))?;
            draw(&canvas, &panels)?;
            root.present()?;
        }

        info!("Saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    #[test]
    fn points_scale_with_resolution() {
        let sheet = style::lookup(style::DEFAULT_STYLE).expect("default style");
        assert_eq!(Canvas::new(72, sheet).px(12.0), 12);
        assert_eq!(Canvas::new(300, sheet).px(12.0), 50);
        assert_eq!(Canvas::new(300, sheet).offset(-3.6), -15);
    }

    #[test]
    fn tiny_lengths_never_vanish() {
        let sheet = style::lookup(style::DEFAULT_STYLE).expect("default style");
        assert_eq!(Canvas::new(10, sheet).px(0.5), 1);
    }
}
