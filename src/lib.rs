//! # Cashflow Forecast
//!
//! Turns two lists of dated transactions (emitted invoices as income, received
//! invoices as expense) into a 12-month income / expense / balance series for a
//! calendar year.
//!
//! ## Core Concepts
//!
//! - **Actual months**: months with enough transactions report their real totals
//! - **Sufficiency threshold**: a month side with fewer than 5 transactions is treated as absent
//! - **Gaps**: months without usable data up to the last observed month are reported as zero
//! - **Projection**: later months follow a least-squares trend over the last 6 populated
//!   months, plus uniform noise of at most 10% of their standard deviation, floored at zero
//! - **Generic counterparties**: invoices to the general public can be left out of income
//!
//! ## Example
//!
//! ```rust,ignore
//! use cashflow_forecast::*;
//!
//! let input = ForecastInput {
//!     emitted: vec![
//!         Transaction::new("03/01/2024", 800.0),
//!         Transaction::new("09/01/2024", 800.0),
//!         Transaction::new("12/01/2024", 800.0),
//!         Transaction::new("20/01/2024", 800.0),
//!         Transaction::new("28/01/2024", 800.0),
//!     ],
//!     received: vec![],
//!     include_global_invoices: false,
//! };
//!
//! let series = process_forecast(&input);
//! let axis = AxisRange::from_values(&series.balance);
//! ```

pub mod aggregation;
pub mod axis;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod sampler;
pub mod schema;
pub mod statistics;

pub use aggregation::{
    aggregate_monthly, apply_sufficiency_filter, exclude_generic_income, last_observed_month,
    ExclusionOutcome, MonthlyBucket, MonthlyBuckets,
};
pub use axis::AxisRange;
pub use config::*;
pub use dates::{month_key, MonthKey};
pub use engine::{balance_series, project_months, ForecastEngine, Projection};
pub use error::{ForecastError, Result};
pub use sampler::{FixedSampler, RngSampler, SequenceSampler, UniformSampler};
pub use schema::*;
pub use statistics::{linear_regression, population_std_dev, TrendLine};

pub struct ForecastProcessor;

impl ForecastProcessor {
    pub fn process(input: &ForecastInput, config: &ForecastConfig) -> Result<ForecastSeries> {
        Self::process_with_sampler(input, config, &mut RngSampler::thread())
    }

    pub fn process_with_sampler<S: UniformSampler>(
        input: &ForecastInput,
        config: &ForecastConfig,
        sampler: &mut S,
    ) -> Result<ForecastSeries> {
        let engine = ForecastEngine::new(config.clone())?;
        Ok(engine.forecast(input, sampler))
    }
}

/// Forecast with the default configuration and a thread-local random source.
pub fn process_forecast(input: &ForecastInput) -> ForecastSeries {
    ForecastEngine::default().forecast_with_thread_rng(input)
}

pub fn process_forecast_with_config(
    input: &ForecastInput,
    config: &ForecastConfig,
) -> Result<ForecastSeries> {
    ForecastProcessor::process(input, config)
}
