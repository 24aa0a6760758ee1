use std::f64::consts::PI;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{CAPTION_POINTS, LABEL_POINTS};
use crate::error::{Result, VizError};
use crate::figure::{Canvas, Panel};

/// Arc resolution used when tessellating wedges.
const DEGREES_PER_SEGMENT: f64 = 1.0;

/// Pie chart whose wedges are laid out counter-clockwise from `start_angle`.
pub struct PieChart<'a> {
    title: &'a str,
    labels: Vec<String>,
    values: Vec<f64>,
    colors: Vec<RGBColor>,
    start_angle: f64,
}

impl<'a> PieChart<'a> {
    pub fn new(title: &'a str, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            title,
            labels,
            values,
            colors: Vec::new(),
            start_angle: 90.0,
        }
    }

    pub fn with_colors(mut self, colors: Vec<RGBColor>) -> Self {
        self.colors = colors;
        self
    }

    /// Angle in degrees, measured counter-clockwise from the positive x axis.
    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    /// Percentage share of each value with one decimal, e.g. `"9.7%"`.
    pub fn percentages(&self) -> Vec<String> {
        let total: f64 = self.values.iter().sum();
        self.values
            .iter()
            .map(|value| format!("{:.1}%", value / total * 100.0))
            .collect()
    }

    /// Start and end angle in degrees of every wedge.
    pub fn wedge_angles(&self) -> Vec<(f64, f64)> {
        let total: f64 = self.values.iter().sum();
        let mut start = self.start_angle;
        self.values
            .iter()
            .map(|value| {
                let sweep = value / total * 360.0;
                let wedge = (start, start + sweep);
                start += sweep;
                wedge
            })
            .collect()
    }

    /// Draws the pie onto `panel`.
    pub fn draw(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        let total: f64 = self.values.iter().sum();
        if self.values.is_empty() || total <= 0.0 || self.values.iter().any(|v| *v < 0.0) {
            return Err(VizError::degenerate(
                self.title,
                "pie needs non-negative values with a positive total",
            ));
        }

        let body = panel.titled(self.title, canvas.bold(CAPTION_POINTS))?;
        let (width, height) = body.dim_in_pixel();
        let center = (width as f64 / 2.0, height as f64 / 2.0);
        let radius = width.min(height) as f64 * 0.34;
        let point = |degrees: f64, distance: f64| -> (i32, i32) {
            let radians = degrees * PI / 180.0;
            (
                (center.0 + distance * radians.cos()).round() as i32,
                (center.1 - distance * radians.sin()).round() as i32,
            )
        };

        let wedges = self.wedge_angles();
        for (index, &(start, end)) in wedges.iter().enumerate() {
            let steps = ((end - start) / DEGREES_PER_SEGMENT).ceil().max(1.0) as usize;
            let mut outline = Vec::with_capacity(steps + 2);
            outline.push(point(0.0, 0.0));
            outline.extend((0..=steps).map(|step| {
                point(start + (end - start) * step as f64 / steps as f64, radius)
            }));
            let color = self.color_at(index, canvas);
            body.draw(&Polygon::new(outline, color.filled()))?;
        }

        let percent_style = canvas
            .text(LABEL_POINTS)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for ((start, end), percentage) in wedges.iter().zip(self.percentages()) {
            let middle = (start + end) / 2.0;
            body.draw_text(&percentage, &percent_style, point(middle, radius * 0.6))?;
        }

        for ((start, end), label) in wedges.iter().zip(&self.labels) {
            let middle = (start + end) / 2.0;
            let horizontal = if middle.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let style = canvas
                .text(LABEL_POINTS)
                .pos(Pos::new(horizontal, VPos::Center));
            body.draw_text(label, &style, point(middle, radius * 1.1))?;
        }

        Ok(())
    }

    fn color_at(&self, index: usize, canvas: &Canvas) -> RGBColor {
        let palette: &[RGBColor] = if self.colors.is_empty() {
            canvas.style.cycle
        } else {
            &self.colors
        };
        palette
            .get(index % palette.len().max(1))
            .copied()
            .unwrap_or(canvas.style.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> PieChart<'static> {
        PieChart::new(
            "Customer Segments",
            vec!["High".into(), "Regular".into(), "Casual".into(), "At".into()],
            vec![245.0, 680.0, 1420.0, 180.0],
        )
    }

    #[test]
    fn percentages_use_one_decimal() {
        assert_eq!(
            segments().percentages(),
            vec!["9.7%", "26.9%", "56.2%", "7.1%"]
        );
    }

    #[test]
    fn wedges_start_at_top_and_cover_full_turn() {
        let angles = segments().wedge_angles();
        assert_eq!(angles[0].0, 90.0);
        assert!((angles[3].1 - 450.0).abs() < 1e-9);
        assert!(angles.windows(2).all(|pair| pair[0].1 == pair[1].0));
    }
}
