use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    apply_grid, axis_number, category_label, segment_end, AXIS_DESC_POINTS, CAPTION_POINTS,
    LABEL_POINTS, PANEL_MARGIN_POINTS, TICK_POINTS, X_LABEL_AREA_POINTS, Y_LABEL_AREA_POINTS,
};
use crate::error::{Result, VizError};
use crate::figure::{Canvas, Panel};

/// Direction the bars grow in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Bar chart over named categories.
pub struct BarChart<'a> {
    title: &'a str,
    labels: Vec<String>,
    values: Vec<f64>,
    colors: Vec<RGBColor>,
    orientation: Orientation,
    alpha: f64,
    value_range: Option<(f64, f64)>,
    value_desc: Option<&'a str>,
    value_labels: Option<fn(f64) -> String>,
    wrap_labels: bool,
    label_step: usize,
}

impl<'a> BarChart<'a> {
    pub fn new(title: &'a str, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            title,
            labels,
            values,
            colors: Vec::new(),
            orientation: Orientation::Vertical,
            alpha: 1.0,
            value_range: None,
            value_desc: None,
            value_labels: None,
            wrap_labels: false,
            label_step: 1,
        }
    }

    /// Per-bar colors, cycled when shorter than the data.
    pub fn with_colors(mut self, colors: Vec<RGBColor>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fixes the value axis instead of fitting it to the data.
    pub fn with_value_range(mut self, low: f64, high: f64) -> Self {
        self.value_range = Some((low, high));
        self
    }

    pub fn with_value_desc(mut self, desc: &'a str) -> Self {
        self.value_desc = Some(desc);
        self
    }

    /// Writes `format(value)` next to the end of each bar.
    pub fn with_value_labels(mut self, format: fn(f64) -> String) -> Self {
        self.value_labels = Some(format);
        self
    }

    /// Breaks category labels onto one line per word.
    pub fn with_wrapped_labels(mut self) -> Self {
        self.wrap_labels = true;
        self
    }

    /// Only labels every `step`-th category.
    pub fn with_label_step(mut self, step: usize) -> Self {
        self.label_step = step.max(1);
        self
    }

    /// Length of the category tick marks. Wrapped labels start right under
    /// the axis line, so they get none.
    fn category_tick_points(&self) -> f64 {
        if self.wrap_labels {
            0.0
        } else {
            TICK_POINTS
        }
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

    fn range(&self) -> (f64, f64) {
        if let Some(range) = self.value_range {
            return range;
        }
        let max = self.values.iter().copied().fold(0.0_f64, f64::max);
        let min = self.values.iter().copied().fold(0.0_f64, f64::min);
        let headroom = if self.value_labels.is_some() { 0.12 } else { 0.05 };
        let span = (max - min).max(f64::EPSILON);
        let floor = if min < 0.0 { min - span * 0.05 } else { 0.0 };
        (floor, max + span * headroom)
    }

    /// Draws the chart onto `panel`.
    pub fn draw(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        if self.values.is_empty() {
            return Err(VizError::degenerate(self.title, "no bars to draw"));
        }
        match self.orientation {
            Orientation::Vertical => self.draw_vertical(panel, canvas),
            Orientation::Horizontal => self.draw_horizontal(panel, canvas),
        }
    }

    fn draw_vertical(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        let count = self.values.len();
        let last = count as i32 - 1;
        let (low, high) = self.range();
        let base = low.max(0.0);

        let label_area = if self.wrap_labels {
            X_LABEL_AREA_POINTS + 26.0
        } else {
            X_LABEL_AREA_POINTS
        };
        let mut chart = ChartBuilder::on(panel)
            .caption(self.title, canvas.bold(CAPTION_POINTS))
            .margin(canvas.px(PANEL_MARGIN_POINTS))
            .x_label_area_size(canvas.px(label_area))
            .y_label_area_size(canvas.px(Y_LABEL_AREA_POINTS))
            .build_cartesian_2d((0..last).into_segmented(), low..high)?;

        chart
            .plotting_area()
            .fill(&canvas.style.panel_background)?;

        let wrap = self.wrap_labels;
        let step = self.label_step;
        let labels = &self.labels;
        let x_format = move |value: &SegmentValue<i32>| {
            if wrap {
                String::new()
            } else {
                category_label(labels, value, step)
            }
        };
        let y_format = |value: &f64| axis_number(*value);

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(count)
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .label_style(canvas.text(LABEL_POINTS))
            .axis_desc_style(canvas.text(AXIS_DESC_POINTS));
        if let Some(desc) = self.value_desc {
            mesh.y_desc(desc);
        }
        mesh.set_tick_mark_size(
            LabelAreaPosition::Bottom,
            canvas.offset(self.category_tick_points()),
        );
        apply_grid(&mut mesh, canvas);
        mesh.disable_x_mesh();
        mesh.draw()?;

        let gap = canvas.px(4.0);
        chart.draw_series(self.values.iter().enumerate().map(|(index, &value)| {
            let color = self.color_at(index, canvas);
            let index = index as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(index), base),
                    (segment_end(index, count), value),
                ],
                color.mix(self.alpha).filled(),
            );
            bar.set_margin(0, 0, gap, gap);
            bar
        }))?;

        if let Some(format) = self.value_labels {
            let style = canvas
                .text(LABEL_POINTS)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let lift = canvas.offset(2.0);
            chart.draw_series(self.values.iter().enumerate().map(|(index, &value)| {
                EmptyElement::at((SegmentValue::CenterOf(index as i32), value))
                    + Text::new(format(value), (0, -lift), style.clone())
            }))?;
        }

        if self.wrap_labels {
            let style = canvas
                .text(LABEL_POINTS)
                .pos(Pos::new(HPos::Center, VPos::Top));
            let line_height = canvas.offset(LABEL_POINTS * 1.2);
            let top = canvas.offset(4.0);
            let lines: Vec<(i32, usize, String)> = self
                .labels
                .iter()
                .enumerate()
                .flat_map(|(index, label)| {
                    label
                        .split(' ')
                        .enumerate()
                        .map(move |(line, word)| (index as i32, line, word.to_owned()))
                })
                .collect();
            chart.draw_series(lines.into_iter().map(|(index, line, word)| {
                EmptyElement::at((SegmentValue::CenterOf(index), low))
                    + Text::new(word, (0, top + line as i32 * line_height), style.clone())
            }))?;
        }

        Ok(())
    }

    fn draw_horizontal(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        let count = self.values.len();
        let last = count as i32 - 1;
        let (low, high) = self.range();
        let base = low.max(0.0);

        let widest = self.labels.iter().map(|label| label.len()).max().unwrap_or(0);
        let label_area = (widest as f64 * LABEL_POINTS * 0.6).max(Y_LABEL_AREA_POINTS);
        let mut chart = ChartBuilder::on(panel)
            .caption(self.title, canvas.bold(CAPTION_POINTS))
            .margin(canvas.px(PANEL_MARGIN_POINTS))
            .x_label_area_size(canvas.px(X_LABEL_AREA_POINTS))
            .y_label_area_size(canvas.px(label_area))
            .build_cartesian_2d(low..high, (0..last).into_segmented())?;

        chart
            .plotting_area()
            .fill(&canvas.style.panel_background)?;

        let step = self.label_step;
        let labels = &self.labels;
        let x_format = |value: &f64| axis_number(*value);
        let y_format = move |value: &SegmentValue<i32>| category_label(labels, value, step);

        let mut mesh = chart.configure_mesh();
        mesh.y_labels(count)
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .label_style(canvas.text(LABEL_POINTS))
            .axis_desc_style(canvas.text(AXIS_DESC_POINTS));
        if let Some(desc) = self.value_desc {
            mesh.x_desc(desc);
        }
        apply_grid(&mut mesh, canvas);
        mesh.disable_y_mesh();
        mesh.draw()?;

        let gap = canvas.px(4.0);
        chart.draw_series(self.values.iter().enumerate().map(|(index, &value)| {
            let color = self.color_at(index, canvas);
            let index = index as i32;
            let mut bar = Rectangle::new(
                [
                    (base, SegmentValue::Exact(index)),
                    (value, segment_end(index, count)),
                ],
                color.mix(self.alpha).filled(),
            );
            bar.set_margin(gap, gap, 0, 0);
            bar
        }))?;

        if let Some(format) = self.value_labels {
            let style = canvas
                .text(LABEL_POINTS)
                .pos(Pos::new(HPos::Left, VPos::Center));
            let shift = canvas.offset(3.0);
            chart.draw_series(self.values.iter().enumerate().map(|(index, &value)| {
                EmptyElement::at((value, SegmentValue::CenterOf(index as i32)))
                    + Text::new(format(value), (shift, 0), style.clone())
            }))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> BarChart<'static> {
        BarChart::new(
            "Average Revenue per Customer by Segment",
            vec!["High Value".to_owned(), "Regular".to_owned()],
            vec![45.2, 28.5],
        )
    }

    #[test]
    fn wrapped_labels_drop_category_ticks() {
        assert_eq!(segments().with_wrapped_labels().category_tick_points(), 0.0);
        assert_eq!(segments().category_tick_points(), TICK_POINTS);
    }

    #[test]
    fn value_labels_reserve_headroom() {
        let (low, high) = segments().with_value_labels(|value| format!("{value}")).range();
        assert_eq!(low, 0.0);
        assert!(high > 45.2 * 1.1);
    }
}
