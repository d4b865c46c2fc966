#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::store::{Snapshot, Tracker};

fn setup() -> (App, Store) {
    let snapshot = Snapshot {
        categories: vec![
            Category::new(1, "Fitness".into(), "#6366f1".into(), "fitness".into()),
            Category::new(2, "Finance".into(), "#10b981".into(), "finance".into()),
        ],
        months: Vec::new(),
    };
    let tracker = Tracker::with_snapshot(
        Database::open_in_memory().unwrap(),
        snapshot,
        YearMonth::new(2024, 2).unwrap(),
    );
    (App::new(&tracker), tracker)
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("month", "month"), 0);
    assert_eq!(levenshtein("mnth", "month"), 1);
    assert_eq!(levenshtein("", "add"), 3);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut tracker) = setup();
    handle_command("categries", &mut app, &mut tracker).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :categries. Did you mean :categories?"
    );
}

#[test]
fn test_screen_and_quit_commands() {
    let (mut app, mut tracker) = setup();
    handle_command("e", &mut app, &mut tracker).unwrap();
    assert_eq!(app.screen, Screen::Entries);
    handle_command("categories", &mut app, &mut tracker).unwrap();
    assert_eq!(app.screen, Screen::Categories);
    handle_command("help", &mut app, &mut tracker).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app, &mut tracker).unwrap();
    assert!(!app.running);
}

#[test]
fn test_month_command() {
    let (mut app, mut tracker) = setup();
    handle_command("month 2023-11", &mut app, &mut tracker).unwrap();
    assert_eq!(tracker.selected(), YearMonth::new(2023, 10).unwrap());
    assert_eq!(app.selected_month, tracker.selected());

    // Bare month number stays in the selected year
    handle_command("m 2", &mut app, &mut tracker).unwrap();
    assert_eq!(tracker.selected(), YearMonth::new(2023, 1).unwrap());

    handle_command("month 13", &mut app, &mut tracker).unwrap();
    assert_eq!(tracker.selected(), YearMonth::new(2023, 1).unwrap());
    assert!(app.status_message.starts_with("Invalid month"));
}

#[test]
fn test_next_and_prev_month_wrap_year() {
    let (mut app, mut tracker) = setup();
    handle_command("month 2024-12", &mut app, &mut tracker).unwrap();
    handle_command("next-month", &mut app, &mut tracker).unwrap();
    assert_eq!(app.selected_month, YearMonth::new(2025, 0).unwrap());
    handle_command("prev-month", &mut app, &mut tracker).unwrap();
    assert_eq!(app.selected_month, YearMonth::new(2024, 11).unwrap());
}

#[test]
fn test_add_command() {
    let (mut app, mut tracker) = setup();
    handle_command("add fitness 30 evening run", &mut app, &mut tracker).unwrap();
    assert_eq!(app.summary[0].total_value, dec!(30));
    assert_eq!(tracker.selected_entries()[0].note, "evening run");
    assert_eq!(app.status_message, "Added 30 to Fitness for Mar 2024");
}

#[test]
fn test_add_command_errors_stay_in_status() {
    let (mut app, mut tracker) = setup();
    handle_command("add Sleep 8", &mut app, &mut tracker).unwrap();
    assert!(app.status_message.contains("not found"));
    assert!(tracker.selected_entries().is_empty());
}

#[test]
fn test_add_without_args_opens_form() {
    let (mut app, mut tracker) = setup();
    handle_command("add", &mut app, &mut tracker).unwrap();
    assert!(app.form.is_some());
}

#[test]
fn test_category_command() {
    let (mut app, mut tracker) = setup();
    handle_command("category Deep Work #8b5cf6 moon", &mut app, &mut tracker).unwrap();
    let created = tracker.get_category_by_id(3).unwrap();
    assert_eq!(created.name, "Deep Work");
    assert_eq!(created.color, "#8b5cf6");
    assert_eq!(created.icon, "moon");
    assert_eq!(app.categories.len(), 3);
    assert_eq!(app.summary.len(), 3);
}

#[test]
fn test_split_category_args() {
    assert_eq!(
        split_category_args("Sleep"),
        ("Sleep".to_string(), Category::DEFAULT_COLOR, Category::DEFAULT_ICON)
    );
    assert_eq!(
        split_category_args("Reading time #123456"),
        ("Reading time".to_string(), "#123456", Category::DEFAULT_ICON)
    );
}

#[test]
fn test_chart_command() {
    let (mut app, mut tracker) = setup();
    handle_command("chart", &mut app, &mut tracker).unwrap();
    assert_eq!(app.chart_kind, ChartKind::Bar);
    handle_command("chart line", &mut app, &mut tracker).unwrap();
    assert_eq!(app.chart_kind, ChartKind::Line);
    handle_command("chart pie", &mut app, &mut tracker).unwrap();
    assert_eq!(app.chart_kind, ChartKind::Line);
}

#[test]
fn test_filter_command() {
    let (mut app, mut tracker) = setup();
    tracker.add_entry(1, dec!(1), "").unwrap();
    tracker.add_entry(2, dec!(2), "").unwrap();

    handle_command("filter Finance", &mut app, &mut tracker).unwrap();
    assert_eq!(app.entry_filter, Some(2));
    assert_eq!(app.screen, Screen::Entries);
    assert_eq!(app.entries.len(), 1);

    handle_command("filter", &mut app, &mut tracker).unwrap();
    assert_eq!(app.entry_filter, None);
    assert_eq!(app.entries.len(), 2);
}
