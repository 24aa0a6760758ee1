//! Country performance dashboard.

use std::path::PathBuf;

use log::debug;

use super::owned_labels;
use crate::charts::{dollars, BarChart, Heatmap, Orientation, ScatterChart};
use crate::config::RenderConfig;
use crate::dataset::{CountryKpi, MovieNowData};
use crate::error::Result;
use crate::figure::FigureBuilder;
use crate::stats::min_max_normalize;
use crate::style::{StyleSheet, RED_YELLOW_GREEN, VIRIDIS};

pub const FILE_NAME: &str = "country_performance_dashboard.png";
pub const TITLE: &str = "Country Performance Dashboard";

/// Row labels of the performance heatmap, top to bottom.
pub const METRIC_LABELS: [&str; 3] = ["Rentals", "Avg Rating", "Revenue"];

/// Rentals, rating and revenue per country, each min-max normalized.
///
/// The result holds one row per entry of [`METRIC_LABELS`] and one column per
/// country.
pub fn performance_matrix(countries: &[CountryKpi]) -> Result<Vec<Vec<f64>>> {
    let rentals: Vec<f64> = countries
        .iter()
        .map(|kpi| f64::from(kpi.total_rentals))
        .collect();
    let ratings: Vec<f64> = countries.iter().map(|kpi| kpi.avg_rating).collect();
    let revenue: Vec<f64> = countries
        .iter()
        .map(|kpi| f64::from(kpi.total_revenue))
        .collect();

    Ok(vec![
        min_max_normalize("total_rentals", &rentals)?,
        min_max_normalize("avg_rating", &ratings)?,
        min_max_normalize("total_revenue", &revenue)?,
    ])
}

/// Writes the dashboard and returns its path.
pub fn render(
    data: &MovieNowData,
    config: &RenderConfig,
    style: &'static StyleSheet,
) -> Result<PathBuf> {
    let countries = data.country_kpis();
    let names = owned_labels(countries.iter().map(|kpi| kpi.country));
    let revenue: Vec<f64> = countries
        .iter()
        .map(|kpi| f64::from(kpi.total_revenue))
        .collect();
    let ratings: Vec<f64> = countries.iter().map(|kpi| kpi.avg_rating).collect();
    let points: Vec<(f64, f64)> = countries
        .iter()
        .map(|kpi| (f64::from(kpi.total_rentals), f64::from(kpi.total_revenue)))
        .collect();
    let colors = VIRIDIS.sample(countries.len());
    let matrix = performance_matrix(countries)?;
    debug!("Country performance matrix: {matrix:?}");

    FigureBuilder::new(config, style)
        .with_title(TITLE)
        .render(FILE_NAME, |canvas, [revenue_panel, rating_panel, scatter_panel, heatmap_panel]| {
            BarChart::new("Total Revenue by Country", names.clone(), revenue)
                .with_colors(colors.clone())
                .with_value_desc("Revenue ($)")
                .with_value_labels(dollars)
                .draw(revenue_panel, canvas)?;

            BarChart::new("Average Rating by Country", names.clone(), ratings)
                .with_orientation(Orientation::Horizontal)
                .with_colors(colors.clone())
                .with_value_range(6.5, 8.5)
                .with_value_desc("Average Rating")
                .draw(rating_panel, canvas)?;

            ScatterChart::new("Rentals vs Revenue by Country", points)
                .with_marker_areas(vec![200.0; countries.len()])
                .with_colors(colors)
                .with_alpha(0.7)
                .with_labels(names.clone())
                .with_axis_desc("Total Rentals", "Total Revenue ($)")
                .draw(scatter_panel, canvas)?;

            Heatmap::new(
                "Performance Heatmap (Normalized)",
                names,
                owned_labels(METRIC_LABELS),
                matrix,
                &RED_YELLOW_GREEN,
            )
            .draw(heatmap_panel, canvas)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_has_one_row_per_metric() {
        let data = MovieNowData::sample();
        let matrix = performance_matrix(data.country_kpis()).expect("matrix");
        assert_eq!(matrix.len(), METRIC_LABELS.len());
        assert!(matrix.iter().all(|row| row.len() == 7));
    }

    #[test]
    fn extremes_are_normalized_per_metric() {
        let data = MovieNowData::sample();
        let matrix = performance_matrix(data.country_kpis()).expect("matrix");
        // USA leads rentals and revenue, Belgium trails both and leads rating.
        assert_eq!(matrix[0][0], 1.0);
        assert_eq!(matrix[0][5], 0.0);
        assert_eq!(matrix[1][5], 1.0);
        assert_eq!(matrix[2][0], 1.0);
        assert_eq!(matrix[2][5], 0.0);
    }
}
