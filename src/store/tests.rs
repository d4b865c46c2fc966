#![allow(clippy::unwrap_used)]

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::TimeZone;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn open_seeded(db: Database) -> Tracker<Database> {
    Tracker::open_with_rng(db, today(), &mut StdRng::seed_from_u64(7)).unwrap()
}

fn fitness_finance() -> Vec<Category> {
    vec![
        Category::new(1, "Fitness".into(), "#6366f1".into(), "fitness".into()),
        Category::new(2, "Finance".into(), "#10b981".into(), "finance".into()),
    ]
}

fn empty_tracker() -> Tracker<Database> {
    let snapshot = Snapshot {
        categories: fitness_finance(),
        months: Vec::new(),
    };
    Tracker::with_snapshot(Database::open_in_memory().unwrap(), snapshot, ym(2024, 2))
}

/// Storage that can be read but refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn put_all(&mut self, _pairs: &[(&str, &str)]) -> Result<()> {
        anyhow::bail!("disk full")
    }
}

/// Storage whose reads always fail; counts attempted writes.
struct UnreadableStore {
    writes: Rc<Cell<usize>>,
}

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("database is locked")
    }

    fn put_all(&mut self, _pairs: &[(&str, &str)]) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_open_empty_storage_uses_seed() {
    let tracker = open_seeded(Database::open_in_memory().unwrap());
    let names: Vec<&str> = tracker.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Fitness", "Finance", "Learning", "Productivity"]);
    assert_eq!(tracker.snapshot().months.len(), seed::SAMPLE_MONTHS);
    assert_eq!(tracker.selected(), ym(2024, 2));
}

#[test]
fn test_open_writes_seed_back() {
    let tracker = open_seeded(Database::open_in_memory().unwrap());
    let stored: Vec<MonthBucket> =
        serde_json::from_str(&tracker.storage.get(DATA_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, tracker.snapshot().months);
    let stored: Vec<Category> =
        serde_json::from_str(&tracker.storage.get(CATEGORIES_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, tracker.categories());
}

#[test]
fn test_open_loads_saved_data() {
    let mut db = Database::open_in_memory().unwrap();
    db.put(
        CATEGORIES_KEY,
        r##"[{"id":9,"name":"Sleep","color":"#000000","icon":"moon"}]"##,
    )
    .unwrap();
    db.put(
        DATA_KEY,
        r#"[{"month":2,"year":2024,"entries":[{"id":"a","categoryId":9,"date":"2024-03-01T08:00:00Z","value":7.5,"note":"nap"}]}]"#,
    )
    .unwrap();

    let tracker = open_seeded(db);
    assert_eq!(tracker.categories().len(), 1);
    assert_eq!(tracker.categories()[0].name, "Sleep");
    let summary = tracker.get_monthly_summary();
    assert_eq!(summary[0].total_value, dec!(7.5));
    assert_eq!(summary[0].entry_count, 1);
}

#[test]
fn test_open_malformed_categories_falls_back() {
    let mut db = Database::open_in_memory().unwrap();
    db.put(CATEGORIES_KEY, "{not json").unwrap();
    db.put(DATA_KEY, "[]").unwrap();

    let tracker = open_seeded(db);
    assert_eq!(tracker.categories(), seed::default_categories().as_slice());
    assert!(tracker.snapshot().months.is_empty());
}

#[test]
fn test_open_malformed_entries_falls_back() {
    let mut db = Database::open_in_memory().unwrap();
    db.put(CATEGORIES_KEY, "[]").unwrap();
    db.put(DATA_KEY, r#"[{"month":14,"year":2024,"entries":[]}]"#)
        .unwrap();

    let tracker = open_seeded(db);
    assert!(tracker.categories().is_empty());
    assert_eq!(tracker.snapshot().months.len(), seed::SAMPLE_MONTHS);
}

#[test]
fn test_open_duplicate_buckets_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    db.put(
        DATA_KEY,
        r#"[{"month":1,"year":2024,"entries":[]},{"month":1,"year":2024,"entries":[]}]"#,
    )
    .unwrap();

    let tracker = open_seeded(db);
    let periods: HashSet<YearMonth> = tracker.snapshot().months.iter().map(|b| b.period).collect();
    assert_eq!(periods.len(), seed::SAMPLE_MONTHS);
}

#[test]
fn test_open_duplicate_category_ids_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    db.put(
        CATEGORIES_KEY,
        r##"[{"id":1,"name":"A","color":"#fff","icon":""},{"id":1,"name":"B","color":"#fff","icon":""}]"##,
    )
    .unwrap();

    let tracker = open_seeded(db);
    assert_eq!(tracker.categories(), seed::default_categories().as_slice());
}

#[test]
fn test_open_read_error_is_not_seeded_over() {
    let writes = Rc::new(Cell::new(0));
    let store = UnreadableStore {
        writes: Rc::clone(&writes),
    };
    let err = Tracker::open_with_rng(store, today(), &mut StdRng::seed_from_u64(3))
        .err()
        .unwrap();
    assert!(format!("{err:#}").contains("database is locked"));
    assert_eq!(writes.get(), 0);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackui.db");

    let (category_id, entry) = {
        let mut tracker = open_seeded(Database::open(&path).unwrap());
        let category = tracker.add_category("Water", "#0ea5e9", "drop").unwrap();
        let entry = tracker.add_entry(category.id, dec!(8), "glasses").unwrap();
        (category.id, entry)
    };

    let tracker = Tracker::open_with_rng(
        Database::open(&path).unwrap(),
        today(),
        &mut StdRng::seed_from_u64(99),
    )
    .unwrap();
    assert_eq!(tracker.get_category_by_id(category_id).unwrap().name, "Water");
    assert_eq!(tracker.get_entries_by_category(category_id), vec![entry]);
}

#[test]
fn test_values_reload_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackui.db");

    let entry = {
        let mut tracker = open_seeded(Database::open(&path).unwrap());
        tracker.add_entry(2, dec!(12345678901234567.89), "").unwrap()
    };

    let tracker = Tracker::open_with_rng(
        Database::open(&path).unwrap(),
        today(),
        &mut StdRng::seed_from_u64(99),
    )
    .unwrap();
    let reloaded = tracker.get_entries_by_category(2);
    let found = reloaded.iter().find(|e| e.id == entry.id).unwrap();
    assert_eq!(found.value, dec!(12345678901234567.89));
    assert_eq!(found.value.to_string(), "12345678901234567.89");
}

#[test]
fn test_selection_resets_to_today_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackui.db");
    {
        let mut tracker = open_seeded(Database::open(&path).unwrap());
        tracker.set_selected_month(ym(2020, 5));
    }
    let tracker = open_seeded(Database::open(&path).unwrap());
    assert_eq!(tracker.selected(), ym(2024, 2));
}

// ── Seed data ─────────────────────────────────────────────────

#[test]
fn test_seed_shape() {
    let current = ym(2024, 1);
    let categories = seed::default_categories();
    let months = seed::sample_months(current, &categories, &mut StdRng::seed_from_u64(1));

    let periods: Vec<YearMonth> = months.iter().map(|b| b.period).collect();
    assert_eq!(
        periods,
        vec![ym(2024, 1), ym(2024, 0), ym(2023, 11), ym(2023, 10), ym(2023, 9), ym(2023, 8)]
    );

    for bucket in &months {
        for category in &categories {
            let entries: Vec<&Entry> = bucket
                .entries
                .iter()
                .filter(|e| e.category_id == category.id)
                .collect();
            assert!((5..15).contains(&entries.len()), "{} entries", entries.len());
            for e in entries {
                assert!(e.value >= dec!(1) && e.value <= dec!(100));
                assert!(bucket.period.contains(e.date.date_naive()));
                assert_eq!(e.note, format!("Sample {} entry", category.name));
            }
        }
    }
}

#[test]
fn test_seed_ids_unique() {
    let months = seed::sample_months(
        ym(2024, 5),
        &seed::default_categories(),
        &mut StdRng::seed_from_u64(3),
    );
    let ids: Vec<&str> = months
        .iter()
        .flat_map(|b| b.entries.iter().map(|e| e.id.as_str()))
        .collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn test_default_category_ids() {
    let ids: Vec<CategoryId> = seed::default_categories().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

// ── add_entry ─────────────────────────────────────────────────

#[test]
fn test_add_entry_creates_bucket_for_selected_month() {
    let mut tracker = empty_tracker();
    let entry = tracker.add_entry(1, dec!(20), "run").unwrap();

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.months.len(), 1);
    assert_eq!(snapshot.months[0].period, ym(2024, 2));
    assert_eq!(snapshot.months[0].entries, vec![entry]);
}

#[test]
fn test_add_entry_appends_to_existing_bucket() {
    let mut tracker = empty_tracker();
    tracker.add_entry(1, dec!(1), "").unwrap();
    tracker.add_entry(2, dec!(2), "").unwrap();

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.months.len(), 1);
    assert_eq!(snapshot.months[0].entries.len(), 2);
}

#[test]
fn test_add_entry_follows_selection() {
    let mut tracker = empty_tracker();
    tracker.add_entry(1, dec!(1), "").unwrap();
    tracker.prev_month();
    tracker.add_entry(1, dec!(2), "").unwrap();
    tracker.set_selected_month(ym(2024, 2));
    tracker.add_entry(1, dec!(3), "").unwrap();

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.months.len(), 2);
    assert_eq!(snapshot.bucket(ym(2024, 2)).unwrap().entries.len(), 2);
    assert_eq!(snapshot.bucket(ym(2024, 1)).unwrap().entries.len(), 1);
}

#[test]
fn test_add_entry_records_fields() {
    let mut tracker = empty_tracker();
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
    let entry = tracker.add_entry_at(2, dec!(12.50), "lunch", at).unwrap();
    assert_eq!(entry.category_id, 2);
    assert_eq!(entry.value, dec!(12.50));
    assert_eq!(entry.note, "lunch");
    assert_eq!(entry.date, at);
    assert!(!entry.id.is_empty());
}

#[test]
fn test_add_entry_dated_now() {
    let mut tracker = empty_tracker();
    let before = Utc::now();
    let entry = tracker.add_entry(1, dec!(1), "").unwrap();
    assert!(entry.date >= before);
    assert!(entry.date <= Utc::now());
}

#[test]
fn test_add_entry_unknown_category_rejected() {
    let mut tracker = empty_tracker();
    let err = tracker.add_entry(42, dec!(5), "").unwrap_err();
    assert_eq!(err, ValidationError::UnknownCategory(42));
    assert!(tracker.snapshot().months.is_empty());
}

#[test]
fn test_add_entry_changes_only_its_category() {
    let mut tracker = empty_tracker();
    tracker.add_entry(2, dec!(7), "").unwrap();
    let before = tracker.get_monthly_summary();

    tracker.add_entry(1, dec!(20), "run").unwrap();
    let after = tracker.get_monthly_summary();

    assert_eq!(after[0].total_value, before[0].total_value + dec!(20));
    assert_eq!(after[0].entry_count, before[0].entry_count + 1);
    assert_eq!(after[1], before[1]);
}

#[test]
fn test_add_entry_persists() {
    let mut tracker = empty_tracker();
    let entry = tracker.add_entry(1, dec!(3), "").unwrap();
    let stored: Vec<MonthBucket> =
        serde_json::from_str(&tracker.storage.get(DATA_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored[0].entries, vec![entry]);
}

#[test]
fn test_failed_write_keeps_mutation() {
    let mut tracker =
        Tracker::open_with_rng(ReadOnlyStore, today(), &mut StdRng::seed_from_u64(5)).unwrap();
    let before = tracker.get_monthly_summary()[0].entry_count;
    tracker.add_entry(1, dec!(1), "").unwrap();
    assert_eq!(tracker.get_monthly_summary()[0].entry_count, before + 1);
}

// ── add_category ──────────────────────────────────────────────

#[test]
fn test_add_category_assigns_next_id() {
    let mut tracker = empty_tracker();
    let category = tracker.add_category("Sleep", "#111111", "moon").unwrap();
    assert_eq!(category.id, 3);
    assert_eq!(tracker.categories().last().unwrap(), &category);
    assert_eq!(tracker.get_category_by_id(3).unwrap().name, "Sleep");
}

#[test]
fn test_add_category_allows_duplicate_names() {
    let mut tracker = empty_tracker();
    let a = tracker.add_category("Fitness", "#000000", "").unwrap();
    assert_ne!(a.id, 1);
    assert_eq!(tracker.categories().len(), 3);
}

#[test]
fn test_add_category_rejects_blank_name() {
    let mut tracker = empty_tracker();
    assert_eq!(
        tracker.add_category("   ", "#000000", "").unwrap_err(),
        ValidationError::EmptyCategoryName
    );
    assert_eq!(tracker.categories().len(), 2);
}

#[test]
fn test_new_category_appears_in_summary_and_chart() {
    let mut tracker = empty_tracker();
    tracker.add_entry(1, dec!(4), "").unwrap();
    let category = tracker.add_category("Sleep", "#111111", "moon").unwrap();

    let summary = tracker.get_monthly_summary();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[2].category, category);
    assert_eq!(summary[2].entry_count, 0);

    let chart = tracker.get_chart_data();
    assert_eq!(chart.datasets[2].data, vec![rust_decimal::Decimal::ZERO]);
}

// ── Reads ─────────────────────────────────────────────────────

#[test]
fn test_get_category_by_id_missing() {
    let tracker = empty_tracker();
    assert!(tracker.get_category_by_id(77).is_none());
}

#[test]
fn test_entries_by_category_for_selected_month() {
    let mut tracker = empty_tracker();
    let a = tracker.add_entry(1, dec!(1), "a").unwrap();
    tracker.add_entry(2, dec!(2), "b").unwrap();
    let c = tracker.add_entry(1, dec!(3), "c").unwrap();

    assert_eq!(tracker.get_entries_by_category(1), vec![a, c]);
    tracker.next_month();
    assert!(tracker.get_entries_by_category(1).is_empty());
    assert!(tracker.selected_entries().is_empty());
}

#[test]
fn test_snapshots_are_immutable() {
    let mut tracker = empty_tracker();
    let before = tracker.snapshot();
    tracker.add_entry(1, dec!(9), "").unwrap();
    tracker.add_category("Sleep", "#111111", "moon").unwrap();

    assert!(before.months.is_empty());
    assert_eq!(before.categories.len(), 2);
    assert_ne!(*before, *tracker.snapshot());
}

#[test]
fn test_queries_idempotent() {
    let tracker = open_seeded(Database::open_in_memory().unwrap());
    assert_eq!(tracker.get_monthly_summary(), tracker.get_monthly_summary());
    assert_eq!(tracker.get_chart_data(), tracker.get_chart_data());
}

#[test]
fn test_empty_store_chart() {
    let tracker = empty_tracker();
    let chart = tracker.get_chart_data();
    assert!(chart.labels.is_empty());
    let labels: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Fitness", "Finance"]);
    assert!(chart.datasets.iter().all(|d| d.data.is_empty()));
}

#[test]
fn test_month_navigation() {
    let mut tracker = empty_tracker();
    tracker.next_month();
    assert_eq!(tracker.selected(), ym(2024, 3));
    tracker.set_selected_month(ym(2024, 0));
    tracker.prev_month();
    assert_eq!(tracker.selected(), ym(2023, 11));
}
