use crate::aggregation::{
    aggregate_monthly, apply_sufficiency_filter, exclude_generic_income, last_observed_month,
    MonthlyBuckets,
};
use crate::config::ForecastConfig;
use crate::dates::MonthKey;
use crate::error::Result;
use crate::sampler::{RngSampler, UniformSampler};
use crate::schema::{ForecastInput, ForecastSeries, MonthOrigin, MONTH_LABELS};
use crate::statistics::TrendLine;
use log::{debug, info};

pub struct ForecastEngine {
    config: ForecastConfig,
}

/// Per-month income and expense before balances are derived.
#[derive(Debug, Clone)]
pub struct Projection {
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub origins: Vec<MonthOrigin>,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn forecast_with_thread_rng(&self, input: &ForecastInput) -> ForecastSeries {
        self.forecast(input, &mut RngSampler::thread())
    }

    pub fn forecast<S: UniformSampler>(
        &self,
        input: &ForecastInput,
        sampler: &mut S,
    ) -> ForecastSeries {
        info!(
            "Forecasting from {} emitted and {} received transactions",
            input.emitted.len(),
            input.received.len()
        );

        let exclusion = exclude_generic_income(
            &input.emitted,
            input.include_global_invoices,
            &self.config.generic_counterparties,
        );
        let excluded_count = exclusion.excluded_count();
        let excluded_amount = exclusion.excluded_amount();

        let mut buckets = aggregate_monthly(exclusion.included, &input.received);
        apply_sufficiency_filter(&mut buckets, self.config.sufficiency_threshold);

        let last_observed =
            last_observed_month(&buckets, self.config.fallback_last_observed_month);
        debug!(
            "{} months survived the sufficiency filter; last observed month is {:02}",
            buckets.len(),
            last_observed
        );

        let (income_trend, expense_trend) = self.fit_trends(&buckets);

        let projection = project_months(
            &buckets,
            last_observed,
            &income_trend,
            &expense_trend,
            self.config.noise_factor,
            sampler,
        );
        let balance = balance_series(&projection.income, &projection.expense);

        ForecastSeries {
            month_labels: MONTH_LABELS.iter().map(|l| l.to_string()).collect(),
            income: projection.income,
            expense: projection.expense,
            balance,
            origins: projection.origins,
            last_observed_month_index: last_observed as usize - 1,
            excluded_count,
            excluded_amount,
            income_trend,
            expense_trend,
        }
    }

    /// Fits income and expense trends over the same trailing window of surviving months.
    fn fit_trends(&self, buckets: &MonthlyBuckets) -> (TrendLine, TrendLine) {
        let skip = buckets.len().saturating_sub(self.config.regression_window);
        let window: Vec<_> = buckets.values().skip(skip).collect();

        let income_values: Vec<f64> = window.iter().map(|b| b.income_total).collect();
        let expense_values: Vec<f64> = window.iter().map(|b| b.expense_total).collect();

        let income_trend = TrendLine::fit(&income_values);
        let expense_trend = TrendLine::fit(&expense_values);

        debug!(
            "Income trend: slope {:.2}, intercept {:.2}, std dev {:.2} over {} months",
            income_trend.slope,
            income_trend.intercept,
            income_trend.std_dev,
            income_trend.history_length
        );
        debug!(
            "Expense trend: slope {:.2}, intercept {:.2}, std dev {:.2} over {} months",
            expense_trend.slope,
            expense_trend.intercept,
            expense_trend.std_dev,
            expense_trend.history_length
        );

        (income_trend, expense_trend)
    }
}

/// Uniform noise of at most `noise_factor` standard deviations either way.
pub fn bounded_noise(draw: f64, std_dev: f64, noise_factor: f64) -> f64 {
    (draw - 0.5) * 2.0 * std_dev * noise_factor
}

/// Fills all twelve months.
///
/// Months with surviving activity report their totals, months up to
/// `last_observed` without activity report zero, and later months are the trend
/// value plus noise, floored at zero. Income is drawn before expense each month.
pub fn project_months<S: UniformSampler + ?Sized>(
    buckets: &MonthlyBuckets,
    last_observed: u32,
    income_trend: &TrendLine,
    expense_trend: &TrendLine,
    noise_factor: f64,
    sampler: &mut S,
) -> Projection {
    let mut income = Vec::with_capacity(12);
    let mut expense = Vec::with_capacity(12);
    let mut origins = Vec::with_capacity(12);

    for key in MonthKey::all() {
        let month = key.number();

        match buckets.get(&key).filter(|b| b.has_activity()) {
            Some(bucket) => {
                income.push(bucket.income_total);
                expense.push(bucket.expense_total);
                origins.push(MonthOrigin::Actual);
            }
            None if month <= last_observed => {
                income.push(0.0);
                expense.push(0.0);
                origins.push(MonthOrigin::Gap);
            }
            None => {
                let position = (month - last_observed) as usize;

                let income_noise =
                    bounded_noise(sampler.sample(), income_trend.std_dev, noise_factor);
                let expense_noise =
                    bounded_noise(sampler.sample(), expense_trend.std_dev, noise_factor);

                income.push((income_trend.extrapolate(position) + income_noise).max(0.0));
                expense.push((expense_trend.extrapolate(position) + expense_noise).max(0.0));
                origins.push(MonthOrigin::Projected);
            }
        }
    }

    Projection {
        income,
        expense,
        origins,
    }
}

pub fn balance_series(income: &[f64], expense: &[f64]) -> Vec<f64> {
    income
        .iter()
        .zip(expense.iter())
        .map(|(i, e)| i - e)
        .collect()
}
