use crate::config::GenericCounterparties;
use crate::dates::{month_key, MonthKey};
use crate::schema::Transaction;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub income_total: f64,
    pub expense_total: f64,
    pub income_count: u32,
    pub expense_count: u32,
}

impl MonthlyBucket {
    pub fn has_activity(&self) -> bool {
        self.income_total > 0.0 || self.expense_total > 0.0
    }
}

pub type MonthlyBuckets = BTreeMap<MonthKey, MonthlyBucket>;

/// Income transactions split into the ones that feed the totals and the ones
/// dropped as generic public-sale invoices.
#[derive(Debug, Clone)]
pub struct ExclusionOutcome<'a> {
    pub included: Vec<&'a Transaction>,
    pub excluded: Vec<&'a Transaction>,
}

impl ExclusionOutcome<'_> {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn excluded_amount(&self) -> f64 {
        self.excluded.iter().map(|t| t.amount).sum()
    }
}

pub fn exclude_generic_income<'a>(
    emitted: &'a [Transaction],
    include_global_invoices: bool,
    generic: &GenericCounterparties,
) -> ExclusionOutcome<'a> {
    if include_global_invoices {
        return ExclusionOutcome {
            included: emitted.iter().collect(),
            excluded: Vec::new(),
        };
    }

    let (excluded, included): (Vec<&Transaction>, Vec<&Transaction>) =
        emitted.iter().partition(|t| {
            t.counterparty_id
                .as_deref()
                .is_some_and(|id| generic.matches(id))
        });

    let outcome = ExclusionOutcome { included, excluded };
    debug!(
        "Excluded {} generic income transactions totalling {:.2}",
        outcome.excluded_count(),
        outcome.excluded_amount()
    );
    outcome
}

/// Buckets income and expense transactions by month. Transactions whose date
/// has no month key are skipped without being counted.
pub fn aggregate_monthly<'a, I, E>(income: I, expense: E) -> MonthlyBuckets
where
    I: IntoIterator<Item = &'a Transaction>,
    E: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets = MonthlyBuckets::new();

    for transaction in income {
        if let Some(key) = month_key(&transaction.date) {
            let bucket = buckets.entry(key).or_default();
            bucket.income_total += transaction.amount;
            bucket.income_count += 1;
        }
    }

    for transaction in expense {
        if let Some(key) = month_key(&transaction.date) {
            let bucket = buckets.entry(key).or_default();
            bucket.expense_total += transaction.amount;
            bucket.expense_count += 1;
        }
    }

    buckets
}

/// Zeroes any side with fewer than `threshold` transactions, then drops buckets
/// left with nothing on either side.
pub fn apply_sufficiency_filter(buckets: &mut MonthlyBuckets, threshold: u32) {
    for (key, bucket) in buckets.iter_mut() {
        if bucket.income_count > 0 && bucket.income_count < threshold {
            debug!(
                "Month {}: discarding {} income transactions (below threshold {})",
                key, bucket.income_count, threshold
            );
            bucket.income_total = 0.0;
            bucket.income_count = 0;
        }

        if bucket.expense_count > 0 && bucket.expense_count < threshold {
            debug!(
                "Month {}: discarding {} expense transactions (below threshold {})",
                key, bucket.expense_count, threshold
            );
            bucket.expense_total = 0.0;
            bucket.expense_count = 0;
        }
    }

    buckets.retain(|_, bucket| !(bucket.income_total == 0.0 && bucket.expense_total == 0.0));
}

/// 1-based number of the latest surviving month, or `fallback` when none survive.
pub fn last_observed_month(buckets: &MonthlyBuckets, fallback: u32) -> u32 {
    buckets
        .keys()
        .next_back()
        .map(|key| key.number())
        .unwrap_or(fallback)
}
