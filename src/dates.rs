use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Placeholder the upstream document parser emits when a record has no date.
pub const MISSING_DATE_PLACEHOLDER: &str = "—";

/// Calendar month (1 = January, 12 = December) used as the bucket key.
///
/// Displays as the zero-padded two-digit key ("01".."12").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(u32);

impl MonthKey {
    pub fn new(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self(month))
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.month())
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self.0
    }

    /// 0-based position within the 12-month series.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = MonthKey> {
        (1..=12).map(MonthKey)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Extracts the month key from a `day/month/year` date string.
///
/// Returns `None` for an empty string, the missing-date placeholder, strings with
/// fewer than two `/`-separated segments, and month segments outside 1..=12.
///
/// # Examples
/// - `"15/03/2024"` -> `03`
/// - `"1/7/2024"` -> `07`
/// - `"2024-03-15"` -> `None`
pub fn month_key(date: &str) -> Option<MonthKey> {
    let date = date.trim();
    if date.is_empty() || date == MISSING_DATE_PLACEHOLDER {
        return None;
    }

    let mut segments = date.split('/');
    let _day = segments.next()?;
    let month = segments.next()?.trim();

    month.parse::<u32>().ok().and_then(MonthKey::new)
}

/// Formats a date the way the upstream parser does (`dd/mm/YYYY`).
pub fn format_day_month_year(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
