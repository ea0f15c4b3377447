use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid noise factor {0}: must be between 0.0 and 1.0")]
    InvalidNoiseFactor(f64),

    #[error("Invalid regression window {0}: must include at least one month")]
    InvalidRegressionWindow(usize),

    #[error("Invalid fallback month {0}: must be between 1 and 12")]
    InvalidFallbackMonth(u32),

    #[error("Invalid sufficiency threshold {0}: must be at least 1")]
    InvalidSufficiencyThreshold(u32),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
