//! Trend and variability estimates over the regression window.
//!
//! Both operate on plain value slices where the list position is the
//! independent variable (`x = 0..n-1`).

use serde::{Deserialize, Serialize};

/// Least-squares trend line plus the spread of the values it was fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub std_dev: f64,
    /// Number of values the line was fitted on
    pub history_length: usize,
}

impl TrendLine {
    pub fn fit(values: &[f64]) -> Self {
        let (slope, intercept) = linear_regression(values);
        Self {
            slope,
            intercept,
            std_dev: population_std_dev(values),
            history_length: values.len(),
        }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Trend value `steps_ahead` positions past the last fitted point (1 = next).
    pub fn extrapolate(&self, steps_ahead: usize) -> f64 {
        self.value_at((self.history_length + steps_ahead).saturating_sub(1) as f64)
    }
}

/// Ordinary least squares of `values` against their index.
///
/// Returns `(slope, intercept)`. With fewer than two values the slope is zero and
/// the intercept is the first value (or zero for an empty slice).
pub fn linear_regression(values: &[f64]) -> (f64, f64) {
    if values.len() < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }

    let n = values.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    (slope, intercept)
}

/// Population standard deviation (divides by `n`). Zero for fewer than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_exact_on_linear_input() {
        let (slope, intercept) = linear_regression(&[100.0, 200.0, 300.0]);
        assert!((slope - 100.0).abs() < 1e-9, "slope was {}", slope);
        assert!((intercept - 100.0).abs() < 1e-9, "intercept was {}", intercept);
    }

    #[test]
    fn test_regression_flat_and_decreasing() {
        let (slope, intercept) = linear_regression(&[50.0, 50.0, 50.0, 50.0]);
        assert!(slope.abs() < 1e-9);
        assert!((intercept - 50.0).abs() < 1e-9);

        let (slope, intercept) = linear_regression(&[30.0, 20.0, 10.0]);
        assert!((slope + 10.0).abs() < 1e-9);
        assert!((intercept - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_degenerate_inputs() {
        assert_eq!(linear_regression(&[]), (0.0, 0.0));
        assert_eq!(linear_regression(&[4000.0]), (0.0, 4000.0));
    }

    #[test]
    fn test_population_std_dev() {
        let sd = population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.0).abs() < 1e-12, "std dev was {}", sd);

        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[123.0]), 0.0);
        assert_eq!(population_std_dev(&[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn test_trend_line_extrapolation() {
        let trend = TrendLine::fit(&[100.0, 200.0, 300.0]);
        assert_eq!(trend.history_length, 3);
        // next point after x = 2 is x = 3
        assert!((trend.extrapolate(1) - 400.0).abs() < 1e-9);
        assert!((trend.extrapolate(3) - 600.0).abs() < 1e-9);
        assert!(trend.std_dev > 0.0);
    }

    #[test]
    fn test_trend_line_empty_history() {
        let trend = TrendLine::fit(&[]);
        assert_eq!(trend, TrendLine::default());
        assert_eq!(trend.extrapolate(1), 0.0);
    }
}
