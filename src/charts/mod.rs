//! Panel-level chart elements drawn onto a [`Panel`](crate::figure::Panel).
//!
//! Each chart is a small builder: construct it with the data, adjust the
//! optional presentation settings and call `draw` with the target panel.

mod bars;
mod heatmap;
mod lines;
mod pie;
mod scatter;

pub use bars::{BarChart, Orientation};
pub use heatmap::Heatmap;
pub use lines::{Marker, MonthlyLineChart};
pub use pie::PieChart;
pub use scatter::ScatterChart;

use plotters::chart::MeshStyle;
use plotters::coord::ranged1d::{Ranged, SegmentValue};
use plotters::prelude::DrawingBackend;
use plotters::style::TRANSPARENT;

use crate::figure::Canvas;

const CAPTION_POINTS: f64 = 12.0;
const LABEL_POINTS: f64 = 9.0;
const AXIS_DESC_POINTS: f64 = 10.0;
const ANNOTATION_POINTS: f64 = 10.0;
const PANEL_MARGIN_POINTS: f64 = 8.0;
const X_LABEL_AREA_POINTS: f64 = 30.0;
const Y_LABEL_AREA_POINTS: f64 = 50.0;
const TICK_POINTS: f64 = 3.5;

/// Formats `value` rounded to an integer with `,` thousands separators.
pub fn thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Whole-dollar amount such as `$8,750`.
pub fn dollars(value: f64) -> String {
    format!("${}", thousands(value))
}

/// Dollar amount with cents such as `$45.20`.
pub fn dollars_cents(value: f64) -> String {
    format!("${value:.2}")
}

/// Compact tick label: thousands separators for large values, at most two
/// decimals otherwise.
pub fn axis_number(value: f64) -> String {
    if value.abs() >= 1000.0 {
        return thousands(value);
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

/// Label for a category tick, showing every `step`-th category.
fn category_label(labels: &[String], value: &SegmentValue<i32>, step: usize) -> String {
    match value {
        SegmentValue::CenterOf(index) if *index >= 0 => {
            let index = *index as usize;
            if index % step.max(1) == 0 {
                labels.get(index).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

/// Upper edge of category `index` in a segmented axis with `count` segments.
fn segment_end(index: i32, count: usize) -> SegmentValue<i32> {
    if index + 1 >= count as i32 {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(index + 1)
    }
}

/// Range covering `values` with `fraction` of the span added on each side.
fn padded_range(values: &[f64], fraction: f64) -> (f64, f64) {
    let (min, max) = crate::stats::min_max(values).unwrap_or((0.0, 1.0));
    let span = if max > min { max - min } else { max.abs().max(1.0) };
    (min - span * fraction, max + span * fraction)
}

/// Applies the style sheet's grid settings to a mesh.
fn apply_grid<X, Y, DB>(mesh: &mut MeshStyle<'_, '_, X, Y, DB>, canvas: &Canvas)
where
    X: Ranged,
    Y: Ranged,
    DB: DrawingBackend,
{
    match canvas.style.grid {
        Some(color) => {
            mesh.bold_line_style(color).light_line_style(TRANSPARENT);
        }
        None => {
            mesh.disable_mesh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(8750.0), "8,750");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-4200.4), "-4,200");
    }

    #[test]
    fn currency_formats() {
        assert_eq!(dollars(2240.0), "$2,240");
        assert_eq!(dollars_cents(45.2), "$45.20");
    }

    #[test]
    fn axis_numbers_are_compact() {
        assert_eq!(axis_number(7.0), "7");
        assert_eq!(axis_number(6.5), "6.5");
        assert_eq!(axis_number(0.25), "0.25");
        assert_eq!(axis_number(12000.0), "12,000");
        assert_eq!(axis_number(-0.001), "0");
    }

    #[test]
    fn category_labels_follow_step() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(category_label(&labels, &SegmentValue::CenterOf(1), 1), "b");
        assert_eq!(category_label(&labels, &SegmentValue::CenterOf(1), 2), "");
        assert_eq!(category_label(&labels, &SegmentValue::Exact(0), 1), "");
        assert_eq!(category_label(&labels, &SegmentValue::CenterOf(5), 1), "");
    }

    #[test]
    fn last_segment_ends_at_axis_end() {
        assert!(matches!(segment_end(0, 3), SegmentValue::Exact(1)));
        assert!(matches!(segment_end(2, 3), SegmentValue::Last));
    }

    #[test]
    fn padded_range_widens_span() {
        assert_eq!(padded_range(&[0.0, 10.0], 0.1), (-1.0, 11.0));
        let (lo, hi) = padded_range(&[5.0, 5.0], 0.1);
        assert!(lo < 5.0 && hi > 5.0);
    }
}
