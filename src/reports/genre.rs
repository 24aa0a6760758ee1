//! Genre performance analysis.

use std::path::PathBuf;

use log::debug;

use super::owned_labels;
use crate::charts::{BarChart, Heatmap, ScatterChart};
use crate::config::RenderConfig;
use crate::dataset::{GenrePerformance, MovieNowData};
use crate::error::Result;
use crate::figure::FigureBuilder;
use crate::stats::{products, rank_descending, LinearFit};
use crate::style::{StyleSheet, RED_YELLOW_BLUE, SET3, TREND_RED, VIRIDIS};

pub const FILE_NAME: &str = "genre_analysis.png";
pub const TITLE: &str = "Genre Performance Analysis";

/// Row labels of the ranking heatmap, top to bottom.
pub const RANK_LABELS: [&str; 3] = ["Rating Rank", "Popularity Rank", "Price Rank"];

/// Bubble area in square points per unit of average price.
const BUBBLE_AREA_PER_PRICE: f64 = 50.0;

/// Rentals multiplied by average price for every genre.
pub fn revenue_potential(genres: &[GenrePerformance]) -> Vec<f64> {
    let rentals: Vec<f64> = genres
        .iter()
        .map(|genre| f64::from(genre.total_rentals))
        .collect();
    let prices: Vec<f64> = genres.iter().map(|genre| genre.avg_price).collect();
    products(&rentals, &prices)
}

/// Descending ranks of rating, rentals and price; one row per entry of
/// [`RANK_LABELS`].
pub fn rankings(genres: &[GenrePerformance]) -> Vec<Vec<f64>> {
    let ratings: Vec<f64> = genres.iter().map(|genre| genre.avg_rating).collect();
    let rentals: Vec<f64> = genres
        .iter()
        .map(|genre| f64::from(genre.total_rentals))
        .collect();
    let prices: Vec<f64> = genres.iter().map(|genre| genre.avg_price).collect();
    vec![
        rank_descending(&ratings),
        rank_descending(&rentals),
        rank_descending(&prices),
    ]
}

/// Least-squares fit of rating against price.
pub fn price_quality_trend(genres: &[GenrePerformance]) -> Result<LinearFit> {
    let prices: Vec<f64> = genres.iter().map(|genre| genre.avg_price).collect();
    let ratings: Vec<f64> = genres.iter().map(|genre| genre.avg_rating).collect();
    LinearFit::fit("avg_price", &prices, &ratings)
}

fn rank_label(rank: f64) -> String {
    format!("{}", rank.trunc() as i64)
}

/// Writes the dashboard and returns its path.
pub fn render(
    data: &MovieNowData,
    config: &RenderConfig,
    style: &'static StyleSheet,
) -> Result<PathBuf> {
    let genres = data.genre_performance();
    let names = owned_labels(genres.iter().map(|genre| genre.genre));
    let popularity: Vec<(f64, f64)> = genres
        .iter()
        .map(|genre| (genre.avg_rating, f64::from(genre.total_rentals)))
        .collect();
    let bubble_areas: Vec<f64> = genres
        .iter()
        .map(|genre| genre.avg_price * BUBBLE_AREA_PER_PRICE)
        .collect();
    let pricing: Vec<(f64, f64)> = genres
        .iter()
        .map(|genre| (genre.avg_price, genre.avg_rating))
        .collect();
    let potential = revenue_potential(genres);
    let ranks = rankings(genres);
    let trend = price_quality_trend(genres)?;
    debug!(
        "Genre rankings: {ranks:?}; price/rating trend slope {:.4}, intercept {:.4}",
        trend.slope, trend.intercept
    );

    let qualitative = SET3.sample(genres.len());
    let sequential = VIRIDIS.sample(genres.len());
    let reversed = RED_YELLOW_BLUE.reversed();

    FigureBuilder::new(config, style)
        .with_title(TITLE)
        .render(FILE_NAME, |canvas, [bubble_panel, potential_panel, pricing_panel, rank_panel]| {
            ScatterChart::new("Genre Performance: Rating vs Popularity", popularity)
                .with_marker_areas(bubble_areas)
                .with_colors(qualitative.clone())
                .with_alpha(0.6)
                .with_labels(names.clone())
                .with_axis_desc("Average Rating", "Total Rentals")
                .draw(bubble_panel, canvas)?;

            BarChart::new("Revenue Potential by Genre", names.clone(), potential)
                .with_colors(qualitative)
                .with_value_desc("Revenue Potential ($)")
                .draw(potential_panel, canvas)?;

            ScatterChart::new("Pricing vs Quality", pricing)
                .with_marker_areas(vec![100.0; genres.len()])
                .with_colors(sequential)
                .with_alpha(0.7)
                .with_trend(TREND_RED)
                .with_axis_desc("Average Price ($)", "Average Rating")
                .draw(pricing_panel, canvas)?;

            Heatmap::new(
                "Genre Rankings (1 = Best)",
                names,
                owned_labels(RANK_LABELS),
                ranks,
                &reversed,
            )
            .with_annotations(rank_label)
            .draw(rank_panel, canvas)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::mean;

    #[test]
    fn revenue_potential_multiplies_rentals_by_price() {
        let data = MovieNowData::sample();
        let potential = revenue_potential(data.genre_performance());
        assert_eq!(potential.len(), 7);
        assert!((potential[0] - 980.0 * 4.5).abs() < 1e-9);
        assert!((potential[1] - 1200.0 * 3.8).abs() < 1e-9);
    }

    #[test]
    fn rankings_are_permutations_without_ties() {
        let data = MovieNowData::sample();
        for row in rankings(data.genre_performance()) {
            let mut sorted = row.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
            assert_eq!(sorted, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        }
    }

    #[test]
    fn best_genres_rank_first() {
        let data = MovieNowData::sample();
        let ranks = rankings(data.genre_performance());
        assert_eq!(ranks[0][0], 1.0); // Drama, rating 8.1
        assert_eq!(ranks[1][1], 1.0); // Comedy, 1200 rentals
        assert_eq!(ranks[2][6], 1.0); // Sci-Fi, $4.80
    }

    #[test]
    fn trend_passes_through_the_centroid() {
        let data = MovieNowData::sample();
        let genres = data.genre_performance();
        let fit = price_quality_trend(genres).expect("fit");
        let prices: Vec<f64> = genres.iter().map(|g| g.avg_price).collect();
        let ratings: Vec<f64> = genres.iter().map(|g| g.avg_rating).collect();
        let centroid = (mean(&prices).expect("x"), mean(&ratings).expect("y"));
        assert!((fit.predict(centroid.0) - centroid.1).abs() < 1e-9);
    }

    #[test]
    fn rank_labels_truncate() {
        assert_eq!(rank_label(2.5), "2");
        assert_eq!(rank_label(7.0), "7");
    }
}
