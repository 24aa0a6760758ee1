//! In-memory sample tables describing the MovieNow rental business.
//!
//! All tables are built once by [`MovieNowData::sample`] and are read-only
//! afterwards.  Every table except [`MonthlyTrend`] is made of literal values;
//! the monthly figures are drawn from seeded normal distributions so repeated
//! runs produce identical numbers.

use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Seed for the monthly trend generator.
pub const TREND_SEED: u64 = 42;

/// Number of months covered by [`MonthlyTrend`] (January 2018 to December 2019).
pub const TREND_MONTHS: usize = 24;

/// Per-country key performance indicators.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryKpi {
    pub country: &'static str,
    pub total_rentals: u32,
    pub avg_rating: f64,
    pub total_revenue: u32,
}

/// Rating, popularity and pricing per movie genre.
#[derive(Clone, Debug, PartialEq)]
pub struct GenrePerformance {
    pub genre: &'static str,
    pub avg_rating: f64,
    pub total_rentals: u32,
    pub avg_price: f64,
}

/// A customer cohort grouped by rental behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerSegment {
    pub segment: &'static str,
    pub customer_count: u32,
    pub avg_revenue_per_customer: f64,
}

impl CustomerSegment {
    /// First word of the segment label, used for compact annotations.
    pub fn short_label(&self) -> &'static str {
        self.segment.split(' ').next().unwrap_or(self.segment)
    }
}

/// Business figures for one calendar month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTrend {
    /// Last day of the month.
    pub month: NaiveDate,
    pub rentals: i64,
    pub revenue: i64,
    pub new_customers: i64,
}

/// Actor counts and ratings per nationality.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorAnalysis {
    pub nationality: &'static str,
    pub male_actors: u32,
    pub female_actors: u32,
    pub avg_rating: f64,
}

/// The five sample tables shared by every report generator.
#[derive(Clone, Debug)]
pub struct MovieNowData {
    country_kpis: Vec<CountryKpi>,
    genre_performance: Vec<GenrePerformance>,
    customer_segments: Vec<CustomerSegment>,
    monthly_trends: Vec<MonthlyTrend>,
    actor_analysis: Vec<ActorAnalysis>,
}

impl MovieNowData {
    /// Builds the sample dataset using [`TREND_SEED`] for the monthly trends.
    pub fn sample() -> Self {
        Self::with_trend_seed(TREND_SEED)
    }

    /// Builds the sample dataset with a custom seed for the monthly trends.
    pub fn with_trend_seed(seed: u64) -> Self {
        let data = Self {
            country_kpis: country_kpis(),
            genre_performance: genre_performance(),
            customer_segments: customer_segments(),
            monthly_trends: monthly_trends(seed),
            actor_analysis: actor_analysis(),
        };
        log::debug!(
            "Built sample dataset: {} countries, {} genres, {} segments, {} months, {} nationalities",
            data.country_kpis.len(),
            data.genre_performance.len(),
            data.customer_segments.len(),
            data.monthly_trends.len(),
            data.actor_analysis.len()
        );
        data
    }

    pub fn country_kpis(&self) -> &[CountryKpi] {
        &self.country_kpis
    }

    pub fn genre_performance(&self) -> &[GenrePerformance] {
        &self.genre_performance
    }

    pub fn customer_segments(&self) -> &[CustomerSegment] {
        &self.customer_segments
    }

    pub fn monthly_trends(&self) -> &[MonthlyTrend] {
        &self.monthly_trends
    }

    pub fn actor_analysis(&self) -> &[ActorAnalysis] {
        &self.actor_analysis
    }
}

impl Default for MovieNowData {
    fn default() -> Self {
        Self::sample()
    }
}

fn country_kpis() -> Vec<CountryKpi> {
    [
        ("USA", 1250, 7.2, 8750),
        ("Germany", 890, 7.8, 6230),
        ("UK", 720, 7.5, 5040),
        ("France", 650, 7.1, 4550),
        ("Spain", 580, 7.9, 4060),
        ("Belgium", 320, 8.1, 2240),
        ("Canada", 420, 7.3, 2940),
    ]
    .into_iter()
    .map(
        |(country, total_rentals, avg_rating, total_revenue)| CountryKpi {
            country,
            total_rentals,
            avg_rating,
            total_revenue,
        },
    )
    .collect()
}

fn genre_performance() -> Vec<GenrePerformance> {
    [
        ("Drama", 8.1, 980, 4.50),
        ("Comedy", 7.3, 1200, 3.80),
        ("Action", 6.9, 1100, 4.20),
        ("Horror", 6.2, 450, 3.50),
        ("Romance", 7.8, 680, 4.10),
        ("Thriller", 7.1, 720, 4.00),
        ("Sci-Fi", 7.5, 380, 4.80),
    ]
    .into_iter()
    .map(
        |(genre, avg_rating, total_rentals, avg_price)| GenrePerformance {
            genre,
            avg_rating,
            total_rentals,
            avg_price,
        },
    )
    .collect()
}

fn customer_segments() -> Vec<CustomerSegment> {
    [
        ("High Value (10+ rentals)", 245, 45.20),
        ("Regular (5-9 rentals)", 680, 28.50),
        ("Casual (1-4 rentals)", 1420, 12.80),
        ("At Risk (rating < 4)", 180, 15.60),
    ]
    .into_iter()
    .map(
        |(segment, customer_count, avg_revenue_per_customer)| CustomerSegment {
            segment,
            customer_count,
            avg_revenue_per_customer,
        },
    )
    .collect()
}

fn actor_analysis() -> Vec<ActorAnalysis> {
    [
        ("USA", 45, 38, 7.1),
        ("UK", 32, 28, 7.6),
        ("Germany", 18, 16, 7.8),
        ("France", 15, 13, 7.3),
        ("Spain", 12, 11, 7.9),
        ("Italy", 8, 7, 7.4),
    ]
    .into_iter()
    .map(
        |(nationality, male_actors, female_actors, avg_rating)| ActorAnalysis {
            nationality,
            male_actors,
            female_actors,
            avg_rating,
        },
    )
    .collect()
}

/// Month-end dates from January 2018 onwards.
fn month_ends(count: usize) -> Vec<NaiveDate> {
    let mut months = Vec::with_capacity(count);
    let (mut year, mut month) = (2018, 1);
    while months.len() < count {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        if let Some(last_day) =
            NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|first| first.pred_opt())
        {
            months.push(last_day);
        }
        year = next_year;
        month = next_month;
    }
    months
}

/// Draws `count` samples from `N(mean, std_dev)` truncated toward zero.
fn normal_column(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64, count: usize) -> Vec<i64> {
    // Normal::new only rejects non-finite or negative deviations.
    let normal = match Normal::new(mean, std_dev) {
        Ok(normal) => normal,
        Err(_) => return vec![mean as i64; count],
    };
    (0..count).map(|_| normal.sample(rng) as i64).collect()
}

fn monthly_trends(seed: u64) -> Vec<MonthlyTrend> {
    let months = month_ends(TREND_MONTHS);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rentals = normal_column(&mut rng, 800.0, 150.0, months.len());
    let revenue = normal_column(&mut rng, 5600.0, 1050.0, months.len());
    let new_customers = normal_column(&mut rng, 45.0, 12.0, months.len());

    months
        .into_iter()
        .zip(rentals)
        .zip(revenue)
        .zip(new_customers)
        .map(|(((month, rentals), revenue), new_customers)| MonthlyTrend {
            month,
            rentals,
            revenue,
            new_customers,
        })
        .collect()
}

/// Short `Jan 2018` style label for a trend month.
pub fn month_label(month: NaiveDate) -> String {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    format!("{} {}", NAMES[month.month0() as usize], month.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_fixed_row_counts() {
        let data = MovieNowData::sample();
        assert_eq!(data.country_kpis().len(), 7);
        assert_eq!(data.genre_performance().len(), 7);
        assert_eq!(data.customer_segments().len(), 4);
        assert_eq!(data.monthly_trends().len(), 24);
        assert_eq!(data.actor_analysis().len(), 6);
    }

    #[test]
    fn monthly_trends_are_reproducible() {
        let first = MovieNowData::sample();
        let second = MovieNowData::sample();
        assert_eq!(first.monthly_trends(), second.monthly_trends());
    }

    #[test]
    fn different_seed_changes_trends() {
        let seeded = MovieNowData::sample();
        let other = MovieNowData::with_trend_seed(7);
        assert_ne!(seeded.monthly_trends(), other.monthly_trends());
    }

    #[test]
    fn months_are_month_ends_of_2018_and_2019() {
        let data = MovieNowData::sample();
        let months: Vec<_> = data.monthly_trends().iter().map(|t| t.month).collect();
        assert_eq!(months.first(), NaiveDate::from_ymd_opt(2018, 1, 31).as_ref());
        assert_eq!(months.get(1), NaiveDate::from_ymd_opt(2018, 2, 28).as_ref());
        assert_eq!(months.last(), NaiveDate::from_ymd_opt(2019, 12, 31).as_ref());
        assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn trend_values_stay_near_their_means() {
        let data = MovieNowData::sample();
        let n = data.monthly_trends().len() as f64;
        let mean_rentals: f64 =
            data.monthly_trends().iter().map(|t| t.rentals as f64).sum::<f64>() / n;
        // Six standard errors either side of 800.
        assert!((800.0 - mean_rentals).abs() < 6.0 * 150.0 / n.sqrt());
        assert!(data.monthly_trends().iter().all(|t| t.rentals > 0));
    }

    #[test]
    fn literal_rows_match_reference_values() {
        let data = MovieNowData::sample();
        let usa = &data.country_kpis()[0];
        assert_eq!(
            (usa.country, usa.total_rentals, usa.total_revenue),
            ("USA", 1250, 8750)
        );
        assert_eq!(data.genre_performance()[6].genre, "Sci-Fi");
        assert_eq!(data.customer_segments()[3].short_label(), "At");
        assert_eq!(data.actor_analysis()[5].nationality, "Italy");
    }

    #[test]
    fn month_label_uses_short_names() {
        let date = NaiveDate::from_ymd_opt(2019, 9, 30).expect("valid date");
        assert_eq!(month_label(date), "Sep 2019");
    }
}
