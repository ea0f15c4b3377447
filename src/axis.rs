use crate::schema::ForecastSeries;
use serde::{Deserialize, Serialize};

const AXIS_PADDING: f64 = 0.1;
const AXIS_ROUNDING: f64 = 1000.0;
const AXIS_STEPS: f64 = 10.0;

/// Chart axis bounds rounded to whole thousands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step_size: f64,
}

impl AxisRange {
    /// Pads the data range by 10% on each side and rounds outwards to thousands.
    /// The lower bound stays at zero unless the padded minimum is negative.
    ///
    /// Non-finite values are ignored; with nothing left the range is all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let Some(first) = finite.next() else {
            return Self {
                min: 0.0,
                max: 0.0,
                step_size: 0.0,
            };
        };

        let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let range = max - min;

        let raw_min = (min - AXIS_PADDING * range).floor();
        let raw_max = (max + AXIS_PADDING * range).ceil();

        let final_min = if raw_min < 0.0 {
            (raw_min / AXIS_ROUNDING).floor() * AXIS_ROUNDING
        } else {
            0.0
        };
        let final_max = (raw_max / AXIS_ROUNDING).ceil() * AXIS_ROUNDING;
        let step_size =
            (((final_max - final_min) / AXIS_STEPS) / AXIS_ROUNDING).ceil() * AXIS_ROUNDING;

        Self {
            min: final_min,
            max: final_max,
            step_size,
        }
    }

    /// One range covering income, expense and balance together.
    pub fn for_forecast(series: &ForecastSeries) -> Self {
        let values: Vec<f64> = series
            .income
            .iter()
            .chain(series.expense.iter())
            .chain(series.balance.iter())
            .copied()
            .collect();
        Self::from_values(&values)
    }
}
