use chrono::{Datelike, NaiveTime, TimeZone, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{Category, Entry, MonthBucket, YearMonth};

/// Number of months of sample history, counting the current one.
pub(crate) const SAMPLE_MONTHS: usize = 6;

pub(crate) fn default_categories() -> Vec<Category> {
    [
        (1, "Fitness", "#6366f1", "fitness"),
        (2, "Finance", "#10b981", "finance"),
        (3, "Learning", "#f59e0b", "learning"),
        (4, "Productivity", "#ef4444", "productivity"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category::new(id, name.into(), color.into(), icon.into()))
    .collect()
}

/// Random sample entries for `current` and the months before it.
///
/// Each category gets 5 to 14 entries per month with whole values in 1..=100,
/// dated on a random day of that month.
pub(crate) fn sample_months<R: Rng + ?Sized>(
    current: YearMonth,
    categories: &[Category],
    rng: &mut R,
) -> Vec<MonthBucket> {
    let mut months = Vec::with_capacity(SAMPLE_MONTHS);
    let mut period = current;

    for _ in 0..SAMPLE_MONTHS {
        let mut bucket = MonthBucket::new(period);
        let days = period.days_in_month();

        for category in categories {
            let count = rng.gen_range(5..15);
            for _ in 0..count {
                let day = rng.gen_range(1..=days);
                let Some(date) = period
                    .first_day()
                    .and_then(|first| first.with_day(day))
                else {
                    continue;
                };
                let value = Decimal::from(rng.gen_range(1..=100u32));
                bucket.entries.push(Entry::new(
                    category.id,
                    value,
                    format!("Sample {} entry", category.name),
                    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
                ));
            }
        }

        months.push(bucket);
        period = period.prev();
    }

    months
}
