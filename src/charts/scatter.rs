use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    apply_grid, axis_number, padded_range, AXIS_DESC_POINTS, CAPTION_POINTS,
    LABEL_POINTS, PANEL_MARGIN_POINTS, X_LABEL_AREA_POINTS, Y_LABEL_AREA_POINTS,
};
use crate::error::{Result, VizError};
use crate::figure::{Canvas, Panel};
use crate::stats::{self, LinearFit};
use crate::style::GRAY;

/// Marker area in square points when no sizes are given.
const DEFAULT_MARKER_AREA: f64 = 36.0;

/// Scatter plot with optional bubble sizes, point labels and reference lines.
pub struct ScatterChart<'a> {
    title: &'a str,
    points: Vec<(f64, f64)>,
    areas: Option<Vec<f64>>,
    colors: Vec<RGBColor>,
    alpha: f64,
    labels: Vec<String>,
    x_desc: Option<&'a str>,
    y_desc: Option<&'a str>,
    trend: Option<RGBColor>,
    mean_lines: bool,
}

impl<'a> ScatterChart<'a> {
    pub fn new(title: &'a str, points: Vec<(f64, f64)>) -> Self {
        Self {
            title,
            points,
            areas: None,
            colors: Vec::new(),
            alpha: 1.0,
            labels: Vec::new(),
            x_desc: None,
            y_desc: None,
            trend: None,
            mean_lines: false,
        }
    }

    /// Marker areas in square points, one per point.
    pub fn with_marker_areas(mut self, areas: Vec<f64>) -> Self {
        self.areas = Some(areas);
        self
    }

    pub fn with_colors(mut self, colors: Vec<RGBColor>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Annotates each point with the label at the same index.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_axis_desc(mut self, x_desc: &'a str, y_desc: &'a str) -> Self {
        self.x_desc = Some(x_desc);
        self.y_desc = Some(y_desc);
        self
    }

    /// Overlays a dashed least-squares line.
    pub fn with_trend(mut self, color: RGBColor) -> Self {
        self.trend = Some(color);
        self
    }

    /// Overlays dashed lines at the mean of each axis.
    pub fn with_mean_lines(mut self) -> Self {
        self.mean_lines = true;
        self
    }

    fn radius_px(&self, index: usize, canvas: &Canvas) -> u32 {
        let area = self
            .areas
            .as_ref()
            .and_then(|areas| areas.get(index).copied())
            .unwrap_or(DEFAULT_MARKER_AREA);
        canvas.px(area.max(0.0).sqrt() / 2.0)
    }

    fn color_at(&self, index: usize, canvas: &Canvas) -> RGBColor {
        let palette: &[RGBColor] = if self.colors.is_empty() {
            &canvas.style.cycle[..1.min(canvas.style.cycle.len())]
        } else {
            &self.colors
        };
        palette
            .get(index % palette.len().max(1))
            .copied()
            .unwrap_or(canvas.style.text)
    }

    /// Draws the chart onto `panel`.
    pub fn draw(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        if self.points.is_empty() {
            return Err(VizError::degenerate(self.title, "no points to draw"));
        }
        let xs: Vec<f64> = self.points.iter().map(|point| point.0).collect();
        let ys: Vec<f64> = self.points.iter().map(|point| point.1).collect();
        let (x_low, x_high) = padded_range(&xs, 0.1);
        let (y_low, y_high) = padded_range(&ys, 0.1);

        let mut chart = ChartBuilder::on(panel)
            .caption(self.title, canvas.bold(CAPTION_POINTS))
            .margin(canvas.px(PANEL_MARGIN_POINTS))
            .x_label_area_size(canvas.px(X_LABEL_AREA_POINTS))
            .y_label_area_size(canvas.px(Y_LABEL_AREA_POINTS))
            .build_cartesian_2d(x_low..x_high, y_low..y_high)?;

        chart
            .plotting_area()
            .fill(&canvas.style.panel_background)?;

        let x_format = |value: &f64| axis_number(*value);
        let y_format = |value: &f64| axis_number(*value);
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .label_style(canvas.text(LABEL_POINTS))
            .axis_desc_style(canvas.text(AXIS_DESC_POINTS));
        if let Some(desc) = self.x_desc {
            mesh.x_desc(desc);
        }
        if let Some(desc) = self.y_desc {
            mesh.y_desc(desc);
        }
        apply_grid(&mut mesh, canvas);
        mesh.draw()?;

        let dash = canvas.px(5.0);
        let gap = canvas.px(3.0);
        if self.mean_lines {
            let mean_x = stats::mean(&xs).unwrap_or_default();
            let mean_y = stats::mean(&ys).unwrap_or_default();
            let style = GRAY.mix(0.5).stroke_width(canvas.stroke(1.0));
            chart.draw_series(DashedLineSeries::new(
                vec![(mean_x, y_low), (mean_x, y_high)],
                dash,
                gap,
                style,
            ))?;
            chart.draw_series(DashedLineSeries::new(
                vec![(x_low, mean_y), (x_high, mean_y)],
                dash,
                gap,
                style,
            ))?;
        }

        chart.draw_series(self.points.iter().enumerate().map(|(index, &point)| {
            Circle::new(
                point,
                self.radius_px(index, canvas),
                self.color_at(index, canvas).mix(self.alpha).filled(),
            )
        }))?;

        if let Some(color) = self.trend {
            let fit = LinearFit::fit(self.title, &xs, &ys)?;
            let (x_min, x_max) = stats::min_max(&xs).unwrap_or((x_low, x_high));
            chart.draw_series(DashedLineSeries::new(
                vec![(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))],
                dash,
                gap,
                color.mix(0.8).stroke_width(canvas.stroke(1.5)),
            ))?;
        }

        if !self.labels.is_empty() {
            let style = canvas
                .text(LABEL_POINTS)
                .pos(Pos::new(HPos::Left, VPos::Bottom));
            let shift = canvas.offset(5.0);
            chart.draw_series(self.points.iter().zip(&self.labels).map(|(&point, label)| {
                EmptyElement::at(point) + Text::new(label.clone(), (shift, -shift), style.clone())
            }))?;
        }

        Ok(())
    }
}
