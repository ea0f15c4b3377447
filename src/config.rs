use crate::error::{ForecastError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum number of transactions a month side needs before its total is trusted.
pub const DEFAULT_SUFFICIENCY_THRESHOLD: u32 = 5;

/// Number of most recent populated months the trend is fitted over.
pub const DEFAULT_REGRESSION_WINDOW: usize = 6;

/// Fraction of the window's standard deviation used as the noise amplitude.
pub const DEFAULT_NOISE_FACTOR: f64 = 0.10;

/// Last observed month assumed when no month survives the sufficiency filter.
pub const DEFAULT_FALLBACK_LAST_OBSERVED_MONTH: u32 = 7;

/// Generic taxpayer id for sales to the general public (domestic).
pub const GENERIC_PUBLIC_ID: &str = "XAXX010101000";

/// Generic taxpayer id for sales to the general public (foreign).
pub const GENERIC_FOREIGN_ID: &str = "XEXX010101000";

/// Counterparty identifiers that stand for aggregated point-of-sale receipts
/// rather than a specific client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GenericCounterparties(Vec<String>);

impl GenericCounterparties {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive membership test.
    pub fn matches(&self, counterparty_id: &str) -> bool {
        self.0
            .iter()
            .any(|id| id.eq_ignore_ascii_case(counterparty_id))
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }
}

impl Default for GenericCounterparties {
    fn default() -> Self {
        Self::new([GENERIC_PUBLIC_ID, GENERIC_FOREIGN_ID])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForecastConfig {
    #[schemars(
        description = "Months whose income or expense side has fewer transactions than this are treated as having no data for that side."
    )]
    pub sufficiency_threshold: u32,

    #[schemars(description = "How many of the most recent populated months feed the trend line.")]
    pub regression_window: usize,

    #[schemars(
        description = "Noise amplitude as a fraction of the window's standard deviation. Range 0.0 to 1.0."
    )]
    pub noise_factor: f64,

    #[schemars(
        description = "Month (1-12) treated as the last observed month when there is no usable data at all."
    )]
    pub fallback_last_observed_month: u32,

    #[schemars(
        description = "Counterparty ids excluded from income unless global invoices are included."
    )]
    pub generic_counterparties: GenericCounterparties,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            sufficiency_threshold: DEFAULT_SUFFICIENCY_THRESHOLD,
            regression_window: DEFAULT_REGRESSION_WINDOW,
            noise_factor: DEFAULT_NOISE_FACTOR,
            fallback_last_observed_month: DEFAULT_FALLBACK_LAST_OBSERVED_MONTH,
            generic_counterparties: GenericCounterparties::default(),
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sufficiency_threshold == 0 {
            return Err(ForecastError::InvalidSufficiencyThreshold(
                self.sufficiency_threshold,
            ));
        }

        if self.regression_window == 0 {
            return Err(ForecastError::InvalidRegressionWindow(
                self.regression_window,
            ));
        }

        if !(0.0..=1.0).contains(&self.noise_factor) {
            return Err(ForecastError::InvalidNoiseFactor(self.noise_factor));
        }

        if !(1..=12).contains(&self.fallback_last_observed_month) {
            return Err(ForecastError::InvalidFallbackMonth(
                self.fallback_last_observed_month,
            ));
        }

        Ok(())
    }

    /// Parses a (possibly partial) JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ForecastConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
