use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Entry;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month. `month` is zero-based (0 = January) to match the
/// persisted bucket format.
///
/// Ordering is by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth", into = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Serialize, Deserialize)]
struct RawYearMonth {
    month: u32,
    year: i32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = String;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        YearMonth::new(raw.year, raw.month)
            .ok_or_else(|| format!("month out of range (0-11): {}", raw.month))
    }
}

impl From<YearMonth> for RawYearMonth {
    fn from(ym: YearMonth) -> Self {
        Self {
            month: ym.month,
            year: ym.year,
        }
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(&self) -> Self {
        if self.month == 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (self.first_day(), next.first_day()) {
            (Some(start), Some(end)) => (end - start).num_days() as u32,
            _ => 30,
        }
    }

    pub fn contains(&self, date: impl Datelike) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    /// Short chart label, e.g. `"Mar 2024"`.
    pub fn label(&self) -> String {
        format!("{} {:04}", MONTH_ABBREVIATIONS[self.month as usize], self.year)
    }

    /// Parse the human form `YYYY-MM` (one-based month).
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Self::new(year, month - 1)
    }
}

/// Formats as `YYYY-MM` with a one-based month.
impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

/// All entries recorded against one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredBucket", into = "StoredBucket")]
pub struct MonthBucket {
    pub period: YearMonth,
    pub entries: Vec<Entry>,
}

// Spelled out rather than `#[serde(flatten)]`: flattened fields are buffered,
// and buffered numbers do not decode under serde_json's arbitrary precision.
#[derive(Serialize, Deserialize)]
struct StoredBucket {
    month: u32,
    year: i32,
    entries: Vec<Entry>,
}

impl TryFrom<StoredBucket> for MonthBucket {
    type Error = String;

    fn try_from(raw: StoredBucket) -> Result<Self, Self::Error> {
        let period = YearMonth::try_from(RawYearMonth {
            month: raw.month,
            year: raw.year,
        })?;
        Ok(Self {
            period,
            entries: raw.entries,
        })
    }
}

impl From<MonthBucket> for StoredBucket {
    fn from(bucket: MonthBucket) -> Self {
        Self {
            month: bucket.period.month,
            year: bucket.period.year,
            entries: bucket.entries,
        }
    }
}

impl MonthBucket {
    pub fn new(period: YearMonth) -> Self {
        Self {
            period,
            entries: Vec::new(),
        }
    }

    /// Find the bucket for `period` in a slice.
    pub fn find(buckets: &[MonthBucket], period: YearMonth) -> Option<&MonthBucket> {
        buckets.iter().find(|b| b.period == period)
    }
}
