//! Grouping and aggregation of expenses into spending summaries.
//!
//! Expenses are first filtered by recurrence frequency, then bucketed by the
//! frequency's period (day, Sunday-start week, or month). Each bucket is then
//! totalled per currency and per category. Currencies are never combined.

use crate::core::expense::{Currency, Expense, Frequency, Period};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Expenses sharing one period key, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<'a> {
    pub key: String,
    pub expenses: Vec<&'a Expense>,
}

/// Totals for a single currency within a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub total: f64,
    /// Subtotals in order of first appearance.
    pub categories: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    /// Date of the first expense in the bucket, used as its label.
    pub date: NaiveDate,
    pub currencies: Vec<CurrencyTotals>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySummary {
    pub frequency: Frequency,
    pub buckets: Vec<(String, BucketSummary)>,
}

impl FrequencySummary {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Groups the expenses logged under `frequency` by `period`.
///
/// Buckets come back in order of the first expense that produced each key.
pub fn group_by(expenses: &[Expense], period: Period, frequency: Frequency) -> Vec<Bucket<'_>> {
    let mut buckets: Vec<Bucket<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for expense in expenses.iter().filter(|e| e.frequency() == frequency) {
        let key = period.bucket_key(expense.date());
        match index.get(&key) {
            Some(&i) => buckets[i].expenses.push(expense),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    key,
                    expenses: vec![expense],
                });
            }
        }
    }

    buckets
}

/// Totals a bucket per currency and category. Returns `None` for an empty
/// bucket.
pub fn summarize(expenses: &[&Expense]) -> Option<BucketSummary> {
    let first = expenses.first()?;
    let mut currencies: Vec<CurrencyTotals> = Vec::new();

    for expense in expenses {
        let totals = match currencies
            .iter()
            .position(|t| &t.currency == expense.currency())
        {
            Some(i) => &mut currencies[i],
            None => {
                currencies.push(CurrencyTotals {
                    currency: expense.currency().clone(),
                    total: 0.0,
                    categories: Vec::new(),
                });
                let last = currencies.len() - 1;
                &mut currencies[last]
            }
        };

        totals.total += expense.amount();
        match totals
            .categories
            .iter_mut()
            .find(|(category, _)| category == expense.category())
        {
            Some((_, subtotal)) => *subtotal += expense.amount(),
            None => totals
                .categories
                .push((expense.category().to_string(), expense.amount())),
        }
    }

    Some(BucketSummary {
        date: first.date(),
        currencies,
    })
}

/// Full summary view for one frequency.
pub fn summary_for(expenses: &[Expense], frequency: Frequency) -> FrequencySummary {
    let buckets = group_by(expenses, frequency.period(), frequency)
        .into_iter()
        .filter_map(|bucket| summarize(&bucket.expenses).map(|summary| (bucket.key, summary)))
        .collect();

    FrequencySummary { frequency, buckets }
}
