//! Temporal analysis of the monthly business trends.

use std::path::PathBuf;

use chrono::NaiveDate;
use log::debug;

use crate::charts::{BarChart, Marker, MonthlyLineChart};
use crate::config::RenderConfig;
use crate::dataset::{month_label, MonthlyTrend, MovieNowData};
use crate::error::Result;
use crate::figure::FigureBuilder;
use crate::stats::{ratios, LinearFit};
use crate::style::{StyleSheet, FOREST_GREEN, ORANGE, PURPLE, TREND_RED};

pub const FILE_NAME: &str = "temporal_analysis.png";
pub const TITLE: &str = "Temporal Analysis - Business Trends";

/// Monthly revenue divided by monthly rentals.
pub fn revenue_per_rental(trends: &[MonthlyTrend]) -> Vec<f64> {
    let revenue: Vec<f64> = trends.iter().map(|month| month.revenue as f64).collect();
    let rentals: Vec<f64> = trends.iter().map(|month| month.rentals as f64).collect();
    ratios(&revenue, &rentals)
}

/// Linear trend of rentals over the month index `0..n`.
pub fn rental_trend(trends: &[MonthlyTrend]) -> Result<LinearFit> {
    let rentals: Vec<f64> = trends.iter().map(|month| month.rentals as f64).collect();
    LinearFit::fit_index("rentals", &rentals)
}

/// Writes the dashboard and returns its path.
pub fn render(
    data: &MovieNowData,
    config: &RenderConfig,
    style: &'static StyleSheet,
) -> Result<PathBuf> {
    let trends = data.monthly_trends();
    let months: Vec<NaiveDate> = trends.iter().map(|month| month.month).collect();
    let rentals: Vec<f64> = trends.iter().map(|month| month.rentals as f64).collect();
    let revenue: Vec<f64> = trends.iter().map(|month| month.revenue as f64).collect();
    let new_customers: Vec<f64> = trends
        .iter()
        .map(|month| month.new_customers as f64)
        .collect();
    let efficiency = revenue_per_rental(trends);
    let trend = rental_trend(trends)?;
    debug!(
        "Rental trend: {:.3} rentals/month from {:.1}",
        trend.slope, trend.intercept
    );

    let line_color = style.cycle.first().copied().unwrap_or(style.text);
    let month_names: Vec<String> = months.iter().copied().map(month_label).collect();

    FigureBuilder::new(config, style)
        .with_title(TITLE)
        .render(FILE_NAME, |canvas, [rental_panel, revenue_panel, customer_panel, efficiency_panel]| {
            MonthlyLineChart::new("Monthly Rental Trends", &months, rentals, line_color)
                .with_trend("Trend", TREND_RED)
                .with_y_desc("Number of Rentals")
                .draw(rental_panel, canvas)?;

            MonthlyLineChart::new("Monthly Revenue Trends", &months, revenue, FOREST_GREEN)
                .with_marker(Marker::Square)
                .with_y_desc("Revenue ($)")
                .draw(revenue_panel, canvas)?;

            BarChart::new("New Customer Acquisition", month_names, new_customers)
                .with_colors(vec![ORANGE])
                .with_alpha(0.7)
                .with_label_step(3)
                .with_value_desc("New Customers")
                .draw(customer_panel, canvas)?;

            MonthlyLineChart::new(
                "Revenue Efficiency (Revenue per Rental)",
                &months,
                efficiency,
                PURPLE,
            )
            .with_marker(Marker::Diamond)
            .with_y_desc("Revenue per Rental ($)")
            .draw(efficiency_panel, canvas)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_exact_quotient() {
        let data = MovieNowData::sample();
        let trends = data.monthly_trends();
        let efficiency = revenue_per_rental(trends);
        assert_eq!(efficiency.len(), 24);
        for (value, month) in efficiency.iter().zip(trends) {
            assert_eq!(*value, month.revenue as f64 / month.rentals as f64);
        }
    }

    #[test]
    fn rental_trend_is_reproducible() {
        let first = rental_trend(MovieNowData::sample().monthly_trends()).expect("fit");
        let second = rental_trend(MovieNowData::sample().monthly_trends()).expect("fit");
        assert_eq!(first, second);
    }
}
