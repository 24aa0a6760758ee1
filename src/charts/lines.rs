use chrono::NaiveDate;
use plotters::prelude::*;

use super::{
    apply_grid, axis_number, padded_range, AXIS_DESC_POINTS, CAPTION_POINTS, LABEL_POINTS,
    PANEL_MARGIN_POINTS, X_LABEL_AREA_POINTS, Y_LABEL_AREA_POINTS,
};
use crate::dataset::month_label;
use crate::error::{Result, VizError};
use crate::figure::{Canvas, Panel};
use crate::stats::LinearFit;

/// Shape drawn at each data point of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Diamond,
}

/// Line over consecutive months with point markers and an optional trend.
pub struct MonthlyLineChart<'a> {
    title: &'a str,
    months: &'a [NaiveDate],
    values: Vec<f64>,
    color: RGBColor,
    marker: Marker,
    trend: Option<(&'a str, RGBColor)>,
    y_desc: Option<&'a str>,
}

impl<'a> MonthlyLineChart<'a> {
    pub fn new(title: &'a str, months: &'a [NaiveDate], values: Vec<f64>, color: RGBColor) -> Self {
        Self {
            title,
            months,
            values,
            color,
            marker: Marker::Circle,
            trend: None,
            y_desc: None,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Adds a dashed linear trend fitted over the month index.
    pub fn with_trend(mut self, label: &'a str, color: RGBColor) -> Self {
        self.trend = Some((label, color));
        self
    }

    pub fn with_y_desc(mut self, desc: &'a str) -> Self {
        self.y_desc = Some(desc);
        self
    }

    /// Draws the chart onto `panel`.
    pub fn draw(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        if self.values.is_empty() || self.values.len() != self.months.len() {
            return Err(VizError::degenerate(
                self.title,
                "one value per month is required",
            ));
        }

        let count = self.values.len();
        let (y_low, y_high) = padded_range(&self.values, 0.1);
        let mut chart = ChartBuilder::on(panel)
            .caption(self.title, canvas.bold(CAPTION_POINTS))
            .margin(canvas.px(PANEL_MARGIN_POINTS))
            .x_label_area_size(canvas.px(X_LABEL_AREA_POINTS))
            .y_label_area_size(canvas.px(Y_LABEL_AREA_POINTS))
            .build_cartesian_2d(-0.5..count as f64 - 0.5, y_low..y_high)?;

        chart
            .plotting_area()
            .fill(&canvas.style.panel_background)?;

        let months = self.months;
        let x_format = |value: &f64| {
            let rounded = value.round();
            if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            months
                .get(rounded as usize)
                .map(|month| month_label(*month))
                .unwrap_or_default()
        };
        let y_format = |value: &f64| axis_number(*value);

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(6)
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .label_style(canvas.text(LABEL_POINTS))
            .axis_desc_style(canvas.text(AXIS_DESC_POINTS));
        if let Some(desc) = self.y_desc {
            mesh.y_desc(desc);
        }
        apply_grid(&mut mesh, canvas);
        mesh.draw()?;

        let points: Vec<(f64, f64)> = self
            .values
            .iter()
            .enumerate()
            .map(|(index, &value)| (index as f64, value))
            .collect();
        let line_width = canvas.stroke(2.0);
        let color = self.color;
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(line_width),
        ))?;

        let size = canvas.px(3.0);
        let half = size as i32;
        match self.marker {
            Marker::Circle => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, size, color.filled())),
                )?;
            }
            Marker::Square => {
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Rectangle::new([(-half, -half), (half, half)], color.filled())
                }))?;
            }
            Marker::Diamond => {
                let reach = (f64::from(size) * 1.3).round() as i32;
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Polygon::new(
                            vec![(0, -reach), (reach, 0), (0, reach), (-reach, 0)],
                            color.filled(),
                        )
                }))?;
            }
        }

        if let Some((label, trend_color)) = self.trend {
            let fit = LinearFit::fit_index(self.title, &self.values)?;
            let last = (count - 1) as f64;
            let trend_width = canvas.stroke(1.5);
            let style = trend_color.mix(0.8).stroke_width(trend_width);
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(0.0, fit.predict(0.0)), (last, fit.predict(last))],
                    canvas.px(5.0),
                    canvas.px(3.0),
                    style,
                ))?
                .label(label)
                .legend(move |(x, y)| {
                    let half = trend_width as i32 * 5;
                    PathElement::new(vec![(x - half, y), (x + half, y)], style)
                });

            chart
                .configure_series_labels()
                .label_font(canvas.text(LABEL_POINTS))
                .background_style(canvas.style.background.mix(0.8))
                .border_style(canvas.style.text.mix(0.3))
                .position(SeriesLabelPosition::UpperLeft)
                .draw()?;
        }

        Ok(())
    }
}
