//! Descriptive statistics used by the report generators.

use std::cmp::Ordering;

use crate::error::{Result, VizError};

/// Scales `values` into `0.0..=1.0` using the column minimum and maximum.
///
/// Returns [`VizError::Degenerate`] for an empty column or one whose values
/// are all equal, since the scale would be a division by zero.
pub fn min_max_normalize(column: &str, values: &[f64]) -> Result<Vec<f64>> {
    let (min, max) = min_max(values)
        .ok_or_else(|| VizError::degenerate(column, "column has no values"))?;
    let span = max - min;
    if span == 0.0 {
        return Err(VizError::degenerate(column, "all values are equal"));
    }
    Ok(values.iter().map(|value| (value - min) / span).collect())
}

/// Returns the smallest and largest finite-ordered values in the slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(min, max), &value| {
        (min.min(value), max.max(value))
    }))
}

/// Ranks values in descending order so the largest value receives rank 1.
///
/// Tied values share the average of the ranks they occupy, so ranks always sum
/// to `n(n+1)/2`.
pub fn rank_descending(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1 ..= end.
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = average;
        }
        start = end;
    }
    ranks
}

/// Degree-1 least-squares fit `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a straight line through the paired samples.
    pub fn fit(column: &str, xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(VizError::degenerate(column, "x and y lengths differ"));
        }
        if xs.len() < 2 {
            return Err(VizError::degenerate(column, "at least two points are required"));
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }
        if sxx == 0.0 {
            return Err(VizError::degenerate(column, "all x values are equal"));
        }

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Fits against the evenly spaced index `0, 1, .., n-1`.
    pub fn fit_index(column: &str, ys: &[f64]) -> Result<Self> {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        Self::fit(column, &xs, ys)
    }

    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Elementwise `numerators[i] / denominators[i]`.
pub fn ratios(numerators: &[f64], denominators: &[f64]) -> Vec<f64> {
    numerators
        .iter()
        .zip(denominators)
        .map(|(n, d)| n / d)
        .collect()
}

/// Elementwise `left[i] * right[i]`.
pub fn products(left: &[f64], right: &[f64]) -> Vec<f64> {
    left.iter().zip(right).map(|(a, b)| a * b).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_maps_extremes_to_unit_interval() {
        let values = [1250.0, 890.0, 720.0, 650.0, 580.0, 320.0, 420.0];
        let normalized = min_max_normalize("total_rentals", &values).expect("normalize");
        assert_eq!(normalized[0], 1.0);
        assert_eq!(normalized[5], 0.0);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn normalization_rejects_constant_column() {
        let err = min_max_normalize("flat", &[3.0, 3.0, 3.0]).unwrap_err();
        assert!(matches!(err, VizError::Degenerate { .. }));
    }

    #[test]
    fn normalization_rejects_empty_column() {
        assert!(min_max_normalize("empty", &[]).is_err());
    }

    #[test]
    fn ranks_are_descending_permutation() {
        let ranks = rank_descending(&[980.0, 1200.0, 1100.0, 450.0, 680.0, 720.0, 380.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0, 6.0, 5.0, 4.0, 7.0]);
    }

    #[test]
    fn tied_values_share_average_rank() {
        let ranks = rank_descending(&[4.0, 7.0, 4.0, 1.0]);
        assert_eq!(ranks, vec![2.5, 1.0, 2.5, 4.0]);
        assert_eq!(ranks.iter().sum::<f64>(), 10.0);
    }

    #[test]
    fn three_way_tie_averages_across_block() {
        let ranks = rank_descending(&[5.0, 5.0, 5.0]);
        assert_eq!(ranks, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.5 * x - 1.0).collect();
        let fit = LinearFit::fit("line", &xs, &ys).expect("fit");
        assert!((fit.slope - 2.5).abs() < 1e-12);
        assert!((fit.intercept + 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn index_fit_of_flat_series_has_zero_slope() {
        let fit = LinearFit::fit_index("flat", &[5.0; 6]).expect("fit");
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
    }

    #[test]
    fn linear_fit_needs_spread_in_x() {
        assert!(LinearFit::fit("price", &[4.0, 4.0], &[1.0, 2.0]).is_err());
        assert!(LinearFit::fit("price", &[4.0], &[1.0]).is_err());
    }

    #[test]
    fn ratios_are_exact_quotients() {
        let revenue = [5600.0, 4800.0];
        let rentals = [800.0, 700.0];
        let result = ratios(&revenue, &rentals);
        assert_eq!(result, vec![5600.0 / 800.0, 4800.0 / 700.0]);
    }

    #[test]
    fn mean_and_products() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(products(&[2.0, 3.0], &[4.0, 0.5]), vec![8.0, 1.5]);
    }
}
