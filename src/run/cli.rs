use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::str::FromStr;

use super::Store;
use crate::aggregate::{self, ChartData};
use crate::db::KeyValueStore;
use crate::models::{Category, Entry, YearMonth};
use crate::store::Tracker;
use crate::ui::util::{format_value, truncate};

pub(crate) fn as_cli(args: &[String], tracker: &mut Store) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], tracker),
        "chart" => cli_chart(&args[2..], tracker),
        "entries" | "e" => cli_entries(&args[2..], tracker),
        "add" | "a" => cli_add(&args[2..], tracker),
        "add-category" => cli_add_category(&args[2..], tracker),
        "categories" | "c" => {
            print!("{}", format_categories(tracker.categories()));
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("trackui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("TrackUI — local-only personal tracking dashboard");
    println!();
    println!("Usage: trackui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive dashboard");
    println!("  summary [YYYY-MM]               Print per-category totals for a month");
    println!("  chart [--json]                  Print monthly series for every category");
    println!("  entries [YYYY-MM]               List entries for a month");
    println!("    --category <name|id>          Only entries of one category");
    println!("  add <category> <value> [note]   Record an entry (category by name or id)");
    println!("    --month <YYYY-MM>             Month to record into (default: current)");
    println!("  add-category <name> [color] [icon]");
    println!("                                  Create a category (color as #rrggbb)");
    println!("  categories                      List all categories");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Environment:");
    println!("  TRACKUI_DATA_DIR                Override the data directory");
    println!("  TRACKUI_LOG                     Log filter (e.g. debug)");
}

/// Value of `--flag <value>` if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Positional arguments with every `--flag <value>` pair removed.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_month(s: &str) -> Result<YearMonth> {
    YearMonth::parse(s).ok_or_else(|| anyhow::anyhow!("Invalid month '{s}'. Use YYYY-MM"))
}

fn cli_summary(args: &[String], tracker: &mut Store) -> Result<()> {
    if let Some(month) = positional(args).first() {
        tracker.set_selected_month(parse_month(month)?);
    }
    print!("{}", format_summary(tracker));
    Ok(())
}

fn cli_chart(args: &[String], tracker: &mut Store) -> Result<()> {
    let chart = tracker.get_chart_data();
    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&chart).context("Failed to encode chart data")?;
        println!("{json}");
    } else {
        print!("{}", format_chart(&chart));
    }
    Ok(())
}

fn cli_entries(args: &[String], tracker: &mut Store) -> Result<()> {
    if let Some(month) = positional(args).first() {
        tracker.set_selected_month(parse_month(month)?);
    }

    let entries = match flag_value(args, "--category") {
        Some(reference) => {
            let category = Category::resolve(tracker.categories(), reference)
                .ok_or_else(|| anyhow::anyhow!("Category '{reference}' not found"))?;
            tracker.get_entries_by_category(category.id)
        }
        None => tracker.selected_entries().to_vec(),
    };

    if entries.is_empty() {
        println!("No entries for {}", tracker.selected().label());
        return Ok(());
    }
    print!("{}", format_entries(tracker.categories(), &entries));
    Ok(())
}

fn cli_add(args: &[String], tracker: &mut Store) -> Result<()> {
    let request = parse_add_args(args, tracker.categories())?;
    if let Some(month) = request.month {
        tracker.set_selected_month(month);
    }
    let entry = tracker.add_entry(request.category.id, request.value, &request.note)?;
    println!(
        "Added {} to {} for {}",
        format_value(entry.value),
        request.category.name,
        tracker.selected().label()
    );
    Ok(())
}

fn cli_add_category(args: &[String], tracker: &mut Store) -> Result<()> {
    let pos = positional(args);
    let Some(name) = pos.first() else {
        anyhow::bail!("Usage: trackui add-category <name> [color] [icon]");
    };
    let color = pos.get(1).copied().unwrap_or(Category::DEFAULT_COLOR);
    let icon = pos.get(2).copied().unwrap_or(Category::DEFAULT_ICON);
    let category = tracker.add_category(name, color, icon)?;
    println!("Created category {} (id {})", category.name, category.id);
    Ok(())
}

pub(crate) struct AddRequest {
    pub(crate) category: Category,
    pub(crate) value: Decimal,
    pub(crate) note: String,
    pub(crate) month: Option<YearMonth>,
}

/// Parse `<category> <value> [note...] [--month YYYY-MM]`.
pub(crate) fn parse_add_args(args: &[String], categories: &[Category]) -> Result<AddRequest> {
    let pos = positional(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: trackui add <category> <value> [note] [--month YYYY-MM]");
    }

    let category = Category::resolve(categories, pos[0])
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Category '{}' not found", pos[0]))?;
    let value = Decimal::from_str(pos[1])
        .with_context(|| format!("Invalid value '{}'", pos[1]))?;
    let note = pos[2..].join(" ");
    let month = flag_value(args, "--month").map(parse_month).transpose()?;

    Ok(AddRequest {
        category,
        value,
        note,
        month,
    })
}

pub(crate) fn format_summary<S: KeyValueStore>(tracker: &Tracker<S>) -> String {
    let summary = tracker.get_monthly_summary();
    let percentages = aggregate::percentage_breakdown(&summary);
    let grand_total = aggregate::saturating_total(summary.iter().map(|t| t.total_value));

    let mut out = String::new();
    let _ = writeln!(out, "TrackUI — {}", tracker.selected().label());
    let _ = writeln!(out, "{}", "─".repeat(52));
    let _ = writeln!(
        out,
        "  {:<20} {:>8} {:>14} {:>6}",
        "Category", "Entries", "Total", "Share"
    );
    for (item, pct) in summary.iter().zip(&percentages) {
        let _ = writeln!(
            out,
            "  {:<20} {:>8} {:>14} {:>5}%",
            truncate(&item.category.name, 20),
            item.entry_count,
            format_value(item.total_value),
            pct.to_string()
        );
    }
    if summary.is_empty() {
        let _ = writeln!(out, "  No categories");
    }
    let _ = writeln!(out, "{}", "─".repeat(52));
    let _ = writeln!(out, "  {:<20} {:>8} {:>14}", "Total", "", format_value(grand_total));
    out
}

pub(crate) fn format_chart(chart: &ChartData) -> String {
    let mut out = String::new();
    if chart.labels.is_empty() {
        let _ = writeln!(out, "No months recorded");
        return out;
    }

    let _ = write!(out, "{:<16}", "");
    for label in &chart.labels {
        let _ = write!(out, " {label:>10}");
    }
    let _ = writeln!(out);
    for dataset in &chart.datasets {
        let _ = write!(out, "{:<16}", truncate(&dataset.label, 16));
        for value in &dataset.data {
            let _ = write!(out, " {:>10}", format_value(*value));
        }
        let _ = writeln!(out);
    }
    out
}

pub(crate) fn format_entries(categories: &[Category], entries: &[Entry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<16} {:>10}  Note", "Date", "Category", "Value");
    let _ = writeln!(out, "{}", "─".repeat(60));
    for entry in entries {
        let name = Category::find_by_id(categories, entry.category_id)
            .map_or("(unknown)", |c| c.name.as_str());
        let _ = writeln!(
            out,
            "{:<12} {:<16} {:>10}  {}",
            entry.date.format("%Y-%m-%d").to_string(),
            truncate(name, 16),
            format_value(entry.value),
            entry.note
        );
    }
    out
}

pub(crate) fn format_categories(categories: &[Category]) -> String {
    let mut out = String::new();
    if categories.is_empty() {
        let _ = writeln!(out, "No categories");
        return out;
    }
    let _ = writeln!(out, "{:<4} {:<20} {:<9} Icon", "ID", "Name", "Color");
    let _ = writeln!(out, "{}", "─".repeat(45));
    for c in categories {
        let _ = writeln!(out, "{:<4} {:<20} {:<9} {}", c.id, c.name, c.color, c.icon);
    }
    out
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
