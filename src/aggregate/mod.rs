//! Summaries and chart series derived from a [`Snapshot`].
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every call.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, CategoryId, Entry, MonthBucket, YearMonth};
use crate::store::Snapshot;

/// One category's activity within a month.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: Category,
    pub(crate) total_value: Decimal,
    pub(crate) entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Dataset {
    pub(crate) label: String,
    pub(crate) color: String,
    pub(crate) data: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ChartData {
    pub(crate) labels: Vec<String>,
    pub(crate) datasets: Vec<Dataset>,
}

/// Totals for every category over the bucket for `period`, in category order.
///
/// Categories without entries are included with zero totals. A month with no
/// bucket is treated as empty.
pub(crate) fn monthly_summary(snapshot: &Snapshot, period: YearMonth) -> Vec<CategoryTotal> {
    let entries = snapshot
        .bucket(period)
        .map(|b| b.entries.as_slice())
        .unwrap_or_default();

    snapshot
        .categories
        .iter()
        .map(|category| {
            let (total_value, entry_count) = entries
                .iter()
                .filter(|e| e.category_id == category.id)
                .fold((Decimal::ZERO, 0), |(sum, n), e| {
                    (sum.saturating_add(e.value), n + 1)
                });
            CategoryTotal {
                category: category.clone(),
                total_value,
                entry_count,
            }
        })
        .collect()
}

/// Per-category series over every known month, oldest first.
///
/// Months without a bucket are not filled in; every series has one point per
/// label.
pub(crate) fn chart_data(snapshot: &Snapshot) -> ChartData {
    let mut months: Vec<&MonthBucket> = snapshot.months.iter().collect();
    months.sort_by_key(|b| b.period);

    let labels = months.iter().map(|b| b.period.label()).collect();

    let datasets = snapshot
        .categories
        .iter()
        .map(|category| Dataset {
            label: category.name.clone(),
            color: category.color.clone(),
            data: months
                .iter()
                .map(|bucket| category_sum(&bucket.entries, category.id))
                .collect(),
        })
        .collect();

    ChartData { labels, datasets }
}

/// Each category's share of the month's grand total as a whole percentage,
/// with halves rounded up. All zeros when the grand total is not positive.
pub(crate) fn percentage_breakdown(summary: &[CategoryTotal]) -> Vec<Decimal> {
    let total = saturating_total(summary.iter().map(|t| t.total_value));
    if total <= Decimal::ZERO {
        return vec![Decimal::ZERO; summary.len()];
    }

    let hundred = Decimal::ONE_HUNDRED;
    let half = Decimal::new(5, 1);
    summary
        .iter()
        .map(|t| {
            t.total_value
                .checked_div(total)
                .and_then(|share| share.checked_mul(hundred))
                .map(|pct| (pct + half).floor())
                .unwrap_or(Decimal::ZERO)
        })
        .collect()
}

/// Entries in `bucket` recorded against `category_id`, in insertion order.
pub(crate) fn entries_for_category(
    bucket: Option<&MonthBucket>,
    category_id: CategoryId,
) -> Vec<&Entry> {
    bucket
        .map(|b| {
            b.entries
                .iter()
                .filter(|e| e.category_id == category_id)
                .collect()
        })
        .unwrap_or_default()
}

/// Sum that clamps at `Decimal::MAX`/`MIN` instead of overflowing.
pub(crate) fn saturating_total(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn category_sum(entries: &[Entry], category_id: CategoryId) -> Decimal {
    saturating_total(
        entries
            .iter()
            .filter(|e| e.category_id == category_id)
            .map(|e| e.value),
    )
}
