use crate::dates::format_day_month_year;
use crate::statistics::TrendLine;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed Spanish month abbreviations, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    #[schemars(
        description = "Issue date as day/month/year separated by '/', e.g. '15/03/2024'. Unparseable dates are ignored."
    )]
    pub date: String,

    #[schemars(
        description = "Monetary amount. Expected to be non-negative but not validated."
    )]
    pub amount: f64,

    #[serde(default)]
    #[schemars(
        description = "Taxpayer id of the other party. Used to recognise generic public-sale invoices."
    )]
    pub counterparty_id: Option<String>,
}

impl Transaction {
    pub fn new(date: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            amount,
            counterparty_id: None,
        }
    }

    /// Builds a transaction from a typed date, formatted as `dd/mm/YYYY`.
    pub fn dated(date: NaiveDate, amount: f64, counterparty_id: Option<String>) -> Self {
        Self {
            date: format_day_month_year(date),
            amount,
            counterparty_id,
        }
    }

    pub fn with_counterparty(mut self, counterparty_id: impl Into<String>) -> Self {
        self.counterparty_id = Some(counterparty_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ForecastInput {
    #[schemars(description = "Invoices issued by the organization (income).")]
    #[serde(default)]
    pub emitted: Vec<Transaction>,

    #[schemars(description = "Invoices received by the organization (expense).")]
    #[serde(default)]
    pub received: Vec<Transaction>,

    #[schemars(
        description = "If false, income invoices addressed to a generic public counterparty are left out of the totals."
    )]
    #[serde(default)]
    pub include_global_invoices: bool,
}

impl ForecastInput {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ForecastInput)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthOrigin {
    /// Totals taken directly from the month's transactions
    Actual,
    /// No usable data inside the observed range; reported as zero
    Gap,
    /// Trend line plus noise, beyond the last observed month
    Projected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub month_labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub balance: Vec<f64>,
    pub origins: Vec<MonthOrigin>,
    /// 0-based index of the last month with surviving data (or the fallback month)
    pub last_observed_month_index: usize,
    pub excluded_count: usize,
    pub excluded_amount: f64,
    pub income_trend: TrendLine,
    pub expense_trend: TrendLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl ForecastSeries {
    /// Annual sums over all twelve months, projected ones included.
    pub fn totals(&self) -> SeriesTotals {
        self.sum_where(|_| true)
    }

    /// Sums over the months backed by real transactions only.
    pub fn actual_totals(&self) -> SeriesTotals {
        self.sum_where(|origin| origin == MonthOrigin::Actual)
    }

    fn sum_where(&self, keep: impl Fn(MonthOrigin) -> bool) -> SeriesTotals {
        let mut totals = SeriesTotals {
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        };

        for (i, origin) in self.origins.iter().enumerate() {
            if keep(*origin) {
                totals.income += self.income[i];
                totals.expense += self.expense[i];
                totals.balance += self.balance[i];
            }
        }

        totals
    }

    pub fn projected_months(&self) -> usize {
        self.origins
            .iter()
            .filter(|o| **o == MonthOrigin::Projected)
            .count()
    }
}
