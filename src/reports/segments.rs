//! Customer segmentation analysis.

use std::path::PathBuf;

use log::debug;

use super::owned_labels;
use crate::charts::{dollars_cents, BarChart, Orientation, PieChart, ScatterChart};
use crate::config::RenderConfig;
use crate::dataset::{CustomerSegment, MovieNowData};
use crate::error::Result;
use crate::figure::FigureBuilder;
use crate::stats::products;
use crate::style::{StyleSheet, SEGMENT_COLORS};

pub const FILE_NAME: &str = "customer_segmentation.png";
pub const TITLE: &str = "Customer Segmentation Analysis";

/// Customer count multiplied by average revenue per customer.
pub fn revenue_impact(segments: &[CustomerSegment]) -> Vec<f64> {
    let counts: Vec<f64> = segments
        .iter()
        .map(|segment| f64::from(segment.customer_count))
        .collect();
    let revenue: Vec<f64> = segments
        .iter()
        .map(|segment| segment.avg_revenue_per_customer)
        .collect();
    products(&counts, &revenue)
}

/// Writes the dashboard and returns its path.
pub fn render(
    data: &MovieNowData,
    config: &RenderConfig,
    style: &'static StyleSheet,
) -> Result<PathBuf> {
    let segments = data.customer_segments();
    let names = owned_labels(segments.iter().map(|segment| segment.segment));
    let short_names = owned_labels(segments.iter().map(CustomerSegment::short_label));
    let counts: Vec<f64> = segments
        .iter()
        .map(|segment| f64::from(segment.customer_count))
        .collect();
    let revenue: Vec<f64> = segments
        .iter()
        .map(|segment| segment.avg_revenue_per_customer)
        .collect();
    let points: Vec<(f64, f64)> = counts.iter().copied().zip(revenue.iter().copied()).collect();
    let impact = revenue_impact(segments);
    debug!("Segment revenue impact: {impact:?}");
    let colors = SEGMENT_COLORS.to_vec();

    FigureBuilder::new(config, style)
        .with_title(TITLE)
        .render(FILE_NAME, |canvas, [share_panel, revenue_panel, impact_panel, matrix_panel]| {
            PieChart::new("Customer Distribution by Segment", names.clone(), counts)
                .with_colors(colors.clone())
                .with_start_angle(90.0)
                .draw(share_panel, canvas)?;

            BarChart::new(
                "Average Revenue per Customer by Segment",
                names.clone(),
                revenue,
            )
            .with_colors(colors.clone())
            .with_value_desc("Average Revenue ($)")
            .with_value_labels(dollars_cents)
            .with_wrapped_labels()
            .draw(revenue_panel, canvas)?;

            BarChart::new("Total Revenue Impact by Segment", names, impact)
                .with_orientation(Orientation::Horizontal)
                .with_colors(colors.clone())
                .with_value_desc("Total Revenue Impact ($)")
                .draw(impact_panel, canvas)?;

            ScatterChart::new("Segment Size vs Value", points)
                .with_marker_areas(vec![300.0; segments.len()])
                .with_colors(colors)
                .with_alpha(0.7)
                .with_mean_lines()
                .with_labels(short_names)
                .with_axis_desc("Number of Customers", "Average Revenue per Customer ($)")
                .draw(matrix_panel, canvas)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_is_count_times_average_revenue() {
        let data = MovieNowData::sample();
        let impact = revenue_impact(data.customer_segments());
        let expected = [245.0 * 45.2, 680.0 * 28.5, 1420.0 * 12.8, 180.0 * 15.6];
        assert_eq!(impact.len(), expected.len());
        for (actual, expected) in impact.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn regular_segment_has_largest_impact() {
        let data = MovieNowData::sample();
        let impact = revenue_impact(data.customer_segments());
        let largest = impact
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).expect("finite"))
            .map(|(index, _)| index);
        assert_eq!(largest, Some(1));
    }
}
