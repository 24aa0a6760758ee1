use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    axis_number, category_label, segment_end, ANNOTATION_POINTS, CAPTION_POINTS, LABEL_POINTS,
    PANEL_MARGIN_POINTS, X_LABEL_AREA_POINTS,
};
use crate::error::{Result, VizError};
use crate::figure::{Canvas, Panel};
use crate::stats;
use crate::style::ColorScale;

const COLORBAR_WIDTH_POINTS: f64 = 46.0;
const COLORBAR_STEPS: usize = 64;

/// Grid of colored cells; rows are listed top to bottom.
pub struct Heatmap<'a> {
    title: &'a str,
    columns: Vec<String>,
    rows: Vec<String>,
    cells: Vec<Vec<f64>>,
    scale: &'a dyn ColorScale,
    annotate: Option<fn(f64) -> String>,
}

impl<'a> Heatmap<'a> {
    /// `cells[row][column]` holds the value of each cell.
    pub fn new(
        title: &'a str,
        columns: Vec<String>,
        rows: Vec<String>,
        cells: Vec<Vec<f64>>,
        scale: &'a dyn ColorScale,
    ) -> Self {
        Self {
            title,
            columns,
            rows,
            cells,
            scale,
            annotate: None,
        }
    }

    /// Writes `format(value)` in the middle of every cell.
    pub fn with_annotations(mut self, format: fn(f64) -> String) -> Self {
        self.annotate = Some(format);
        self
    }

    fn value_range(&self) -> (f64, f64) {
        let values: Vec<f64> = self.cells.iter().flatten().copied().collect();
        stats::min_max(&values).unwrap_or((0.0, 1.0))
    }

    fn position(&self, value: f64, (low, high): (f64, f64)) -> f64 {
        if high > low {
            (value - low) / (high - low)
        } else {
            0.5
        }
    }

    /// Draws the heatmap and its color bar onto `panel`.
    pub fn draw(&self, panel: &Panel<'_>, canvas: &Canvas) -> Result<()> {
        let row_count = self.rows.len();
        let column_count = self.columns.len();
        if row_count == 0 || column_count == 0 {
            return Err(VizError::degenerate(self.title, "heatmap has no cells"));
        }
        if self.cells.len() != row_count || self.cells.iter().any(|row| row.len() != column_count)
        {
            return Err(VizError::degenerate(
                self.title,
                "cell grid does not match labels",
            ));
        }

        let body = panel.titled(self.title, canvas.bold(CAPTION_POINTS))?;
        let width = body.dim_in_pixel().0;
        let (grid_area, bar_area) =
            body.split_horizontally(width.saturating_sub(canvas.px(COLORBAR_WIDTH_POINTS)));

        let widest_row = self.rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let range = self.value_range();
        let mut chart = ChartBuilder::on(&grid_area)
            .margin(canvas.px(PANEL_MARGIN_POINTS))
            .x_label_area_size(canvas.px(X_LABEL_AREA_POINTS))
            .y_label_area_size(canvas.px(widest_row as f64 * LABEL_POINTS * 0.6 + 8.0))
            .build_cartesian_2d(
                (0..column_count as i32 - 1).into_segmented(),
                (0..row_count as i32 - 1).into_segmented(),
            )?;

        chart
            .plotting_area()
            .fill(&canvas.style.panel_background)?;

        // Row 0 is drawn at the top, so the y axis indexes rows in reverse.
        let bottom_up_rows: Vec<String> = self.rows.iter().rev().cloned().collect();
        let columns = &self.columns;
        let x_format = |value: &SegmentValue<i32>| category_label(columns, value, 1);
        let y_format = |value: &SegmentValue<i32>| category_label(&bottom_up_rows, value, 1);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(column_count)
            .y_labels(row_count)
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .label_style(canvas.text(LABEL_POINTS))
            .draw()?;

        let to_axis = |row: usize| (row_count - 1 - row) as i32;
        chart.draw_series(self.cells.iter().enumerate().flat_map(|(row, values)| {
            values.iter().enumerate().map(move |(column, &value)| {
                let (x, y) = (column as i32, to_axis(row));
                Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (segment_end(x, column_count), segment_end(y, row_count)),
                    ],
                    self.scale.color_at(self.position(value, range)).filled(),
                )
            })
        }))?;

        if let Some(format) = self.annotate {
            let style = canvas
                .text_colored(ANNOTATION_POINTS, RGBColor(0, 0, 0))
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(self.cells.iter().enumerate().flat_map(|(row, values)| {
                let style = style.clone();
                values.iter().enumerate().map(move |(column, &value)| {
                    Text::new(
                        format(value),
                        (
                            SegmentValue::CenterOf(column as i32),
                            SegmentValue::CenterOf(to_axis(row)),
                        ),
                        style.clone(),
                    )
                })
            }))?;
        }

        draw_colorbar(&bar_area, canvas, self.scale, range)
    }
}

/// Vertical color bar spanning `low..high`.
fn draw_colorbar(
    area: &Panel<'_>,
    canvas: &Canvas,
    scale: &dyn ColorScale,
    (low, high): (f64, f64),
) -> Result<()> {
    let high = if high > low { high } else { low + 1.0 };
    let mut chart = ChartBuilder::on(area)
        .margin_top(canvas.px(PANEL_MARGIN_POINTS))
        .margin_bottom(canvas.px(PANEL_MARGIN_POINTS + X_LABEL_AREA_POINTS))
        .margin_right(canvas.px(4.0))
        .right_y_label_area_size(canvas.px(COLORBAR_WIDTH_POINTS * 0.6))
        .build_cartesian_2d(0.0..1.0, low..high)?;

    let y_format = |value: &f64| axis_number(*value);
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .x_labels(0)
        .y_labels(5)
        .y_label_formatter(&y_format)
        .label_style(canvas.text(LABEL_POINTS - 1.0))
        .draw()?;

    let step = (high - low) / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|index| {
        let from = low + step * index as f64;
        let to = from + step;
        let t = (index as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, from), (1.0, to)], scale.color_at(t).filled())
    }))?;
    Ok(())
}
