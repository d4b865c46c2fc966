pub(crate) mod seed;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::aggregate::{self, CategoryTotal, ChartData};
use crate::db::KeyValueStore;
use crate::models::{Category, CategoryId, Entry, MonthBucket, YearMonth};

pub(crate) const CATEGORIES_KEY: &str = "tracker_categories";
pub(crate) const DATA_KEY: &str = "tracker_data";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("no category with id {0}")]
    UnknownCategory(CategoryId),
    #[error("category name must not be empty")]
    EmptyCategoryName,
}

/// Immutable view of everything the tracker stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) categories: Vec<Category>,
    pub(crate) months: Vec<MonthBucket>,
}

impl Snapshot {
    pub(crate) fn bucket(&self, period: YearMonth) -> Option<&MonthBucket> {
        MonthBucket::find(&self.months, period)
    }

    /// A copy with `entry` appended to the bucket for `period`, creating the
    /// bucket if this is the month's first entry.
    pub(crate) fn with_entry(&self, period: YearMonth, entry: Entry) -> Self {
        let mut next = self.clone();
        match next.months.iter_mut().find(|b| b.period == period) {
            Some(bucket) => bucket.entries.push(entry),
            None => {
                let mut bucket = MonthBucket::new(period);
                bucket.entries.push(entry);
                next.months.push(bucket);
            }
        }
        next
    }

    pub(crate) fn with_category(&self, category: Category) -> Self {
        let mut next = self.clone();
        next.categories.push(category);
        next
    }
}

/// The entry store: owns categories, month buckets and the selected month,
/// and writes both collections to storage after every mutation.
pub(crate) struct Tracker<S: KeyValueStore> {
    storage: S,
    state: Arc<Snapshot>,
    selected: YearMonth,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load persisted data, falling back to the built-in seed when a key is
    /// absent or malformed. A failed storage read is an error: seeding then
    /// would overwrite data that is still on disk.
    pub(crate) fn open(storage: S, today: NaiveDate) -> Result<Self> {
        Self::open_with_rng(storage, today, &mut rand::thread_rng())
    }

    pub(crate) fn open_with_rng<R: Rng + ?Sized>(
        storage: S,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Self> {
        let selected = YearMonth::from_date(today);

        let saved_categories = storage
            .get(CATEGORIES_KEY)
            .context("Failed to read saved categories")?;
        let categories = match saved_categories.as_deref().map(parse_categories) {
            Some(Ok(categories)) => categories,
            None => {
                log::info!("no saved categories, using defaults");
                seed::default_categories()
            }
            Some(Err(e)) => {
                log::warn!("discarding saved categories: {e:#}");
                seed::default_categories()
            }
        };

        let saved_months = storage
            .get(DATA_KEY)
            .context("Failed to read saved entries")?;
        let months = match saved_months.as_deref().map(parse_months) {
            Some(Ok(months)) => months,
            None => {
                log::info!("no saved entries, generating sample data");
                seed::sample_months(selected, &seed::default_categories(), rng)
            }
            Some(Err(e)) => {
                log::warn!("discarding saved entries: {e:#}");
                seed::sample_months(selected, &seed::default_categories(), rng)
            }
        };

        let mut tracker = Self {
            storage,
            state: Arc::new(Snapshot { categories, months }),
            selected,
        };
        tracker.persist();
        Ok(tracker)
    }

    #[cfg(test)]
    pub(crate) fn with_snapshot(storage: S, snapshot: Snapshot, selected: YearMonth) -> Self {
        Self {
            storage,
            state: Arc::new(snapshot),
            selected,
        }
    }

    // ── Reads ─────────────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state)
    }

    pub(crate) fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub(crate) fn selected(&self) -> YearMonth {
        self.selected
    }

    pub(crate) fn get_category_by_id(&self, id: CategoryId) -> Option<&Category> {
        Category::find_by_id(&self.state.categories, id)
    }

    pub(crate) fn get_entries_by_category(&self, category_id: CategoryId) -> Vec<Entry> {
        aggregate::entries_for_category(self.state.bucket(self.selected), category_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Entries of the selected month, in insertion order.
    pub(crate) fn selected_entries(&self) -> &[Entry] {
        self.state
            .bucket(self.selected)
            .map(|b| b.entries.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn get_monthly_summary(&self) -> Vec<CategoryTotal> {
        aggregate::monthly_summary(&self.state, self.selected)
    }

    pub(crate) fn get_chart_data(&self) -> ChartData {
        aggregate::chart_data(&self.state)
    }

    // ── Selection ─────────────────────────────────────────────

    pub(crate) fn set_selected_month(&mut self, period: YearMonth) {
        self.selected = period;
    }

    pub(crate) fn next_month(&mut self) {
        self.selected = self.selected.next();
    }

    pub(crate) fn prev_month(&mut self) {
        self.selected = self.selected.prev();
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Record a value against a category in the selected month, dated now.
    pub(crate) fn add_entry(
        &mut self,
        category_id: CategoryId,
        value: Decimal,
        note: &str,
    ) -> Result<Entry, ValidationError> {
        self.add_entry_at(category_id, value, note, Utc::now())
    }

    pub(crate) fn add_entry_at(
        &mut self,
        category_id: CategoryId,
        value: Decimal,
        note: &str,
        date: DateTime<Utc>,
    ) -> Result<Entry, ValidationError> {
        if self.get_category_by_id(category_id).is_none() {
            return Err(ValidationError::UnknownCategory(category_id));
        }

        let entry = Entry::new(category_id, value, note.to_string(), date);
        self.state = Arc::new(self.state.with_entry(self.selected, entry.clone()));
        log::debug!(
            "added entry {} ({category_id}, {value}) to {}",
            entry.id,
            self.selected
        );
        self.persist();
        Ok(entry)
    }

    pub(crate) fn add_category(
        &mut self,
        name: &str,
        color: &str,
        icon: &str,
    ) -> Result<Category, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }

        let category = Category::new(
            Category::next_id(&self.state.categories),
            name.to_string(),
            color.to_string(),
            icon.to_string(),
        );
        self.state = Arc::new(self.state.with_category(category.clone()));
        log::debug!("added category {} ({})", category.id, category.name);
        self.persist();
        Ok(category)
    }

    /// Best-effort write of both collections; failures are logged only.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            log::warn!("failed to save tracker data: {e:#}");
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let categories = serde_json::to_string(&self.state.categories)
            .context("Failed to serialize categories")?;
        let months =
            serde_json::to_string(&self.state.months).context("Failed to serialize entries")?;
        self.storage
            .put_all(&[(CATEGORIES_KEY, categories.as_str()), (DATA_KEY, months.as_str())])
    }
}

fn parse_categories(json: &str) -> Result<Vec<Category>> {
    let categories: Vec<Category> =
        serde_json::from_str(json).context("Malformed category data")?;

    let mut seen = HashSet::new();
    if let Some(dup) = categories.iter().find(|c| !seen.insert(c.id)) {
        anyhow::bail!("Duplicate category id: {}", dup.id);
    }
    Ok(categories)
}

fn parse_months(json: &str) -> Result<Vec<MonthBucket>> {
    let months: Vec<MonthBucket> = serde_json::from_str(json).context("Malformed entry data")?;

    let mut seen = HashSet::new();
    if let Some(dup) = months.iter().find(|b| !seen.insert(b.period)) {
        anyhow::bail!("Duplicate month bucket: {}", dup.period);
    }
    Ok(months)
}

#[cfg(test)]
mod tests;
