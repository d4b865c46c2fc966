use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, ChartKind, Screen};
use super::util::format_value;
use crate::models::{Category, YearMonth};
use crate::run::{parse_add_args, Store};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit TrackUI", cmd_quit, r);
    register_command!("quit", "Quit TrackUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Entries", cmd_entries, r);
    register_command!("entries", "Go to Entries", cmd_entries, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "add",
        "Add entry (e.g. :add Fitness 30 evening run)",
        cmd_add,
        r
    );
    register_command!("a", "Add entry (e.g. :a Fitness 30)", cmd_add, r);
    register_command!(
        "category",
        "Create category (e.g. :category Sleep #8b5cf6 moon)",
        cmd_category,
        r
    );
    register_command!("chart", "Switch chart (:chart line|bar)", cmd_chart, r);
    register_command!(
        "filter",
        "Filter entries by category (no args clears)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter entries by category", cmd_filter, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, tracker)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_entries(_args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Entries;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Month: {}", tracker.selected().label()));
        return Ok(());
    }

    // Accept "2024-01", "2024-1", "01" or "1" (the last two in the selected year)
    let month = if args.len() <= 2 {
        args.parse::<u32>().ok().and_then(|m| {
            m.checked_sub(1)
                .and_then(|m0| YearMonth::new(tracker.selected().year(), m0))
        })
    } else {
        YearMonth::parse(args)
    };

    match month {
        Some(m) => {
            tracker.set_selected_month(m);
            app.refresh(tracker);
            app.set_status(format!("Switched to {}", m.label()));
        }
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }

    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    tracker.next_month();
    app.refresh(tracker);
    app.set_status(format!("Month: {}", tracker.selected().label()));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    tracker.prev_month();
    app.refresh(tracker);
    app.set_status(format!("Month: {}", tracker.selected().label()));
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.open_form(None);
        return Ok(());
    }

    let words: Vec<String> = args.split_whitespace().map(String::from).collect();
    let request = match parse_add_args(&words, tracker.categories()) {
        Ok(r) => r,
        Err(e) => {
            app.set_status(format!("{e}"));
            return Ok(());
        }
    };
    if let Some(month) = request.month {
        tracker.set_selected_month(month);
    }

    match tracker.add_entry(request.category.id, request.value, &request.note) {
        Ok(entry) => {
            app.refresh(tracker);
            app.set_status(format!(
                "Added {} to {} for {}",
                format_value(entry.value),
                request.category.name,
                tracker.selected().label()
            ));
        }
        Err(e) => app.set_status(format!("Could not add entry: {e}")),
    }
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name> [#color] [icon]");
        return Ok(());
    }

    let (name, color, icon) = split_category_args(args);
    match tracker.add_category(&name, color, icon) {
        Ok(category) => {
            app.refresh(tracker);
            app.set_status(format!("Created category: {}", category.name));
        }
        Err(e) => app.set_status(format!("Could not create category: {e}")),
    }
    Ok(())
}

/// Split `<name words…> [#color] [icon]`. The color is the first `#` token;
/// an icon may only follow a color.
pub(crate) fn split_category_args(args: &str) -> (String, &str, &str) {
    let words: Vec<&str> = args.split_whitespace().collect();
    match words.iter().position(|w| w.starts_with('#')) {
        Some(pos) => (
            words[..pos].join(" "),
            words[pos],
            words.get(pos + 1).copied().unwrap_or(Category::DEFAULT_ICON),
        ),
        None => (
            words.join(" "),
            Category::DEFAULT_COLOR,
            Category::DEFAULT_ICON,
        ),
    }
}

fn cmd_chart(args: &str, app: &mut App, _tracker: &mut Store) -> anyhow::Result<()> {
    app.chart_kind = match args.to_ascii_lowercase().as_str() {
        "" => app.chart_kind.toggle(),
        "line" => ChartKind::Line,
        "bar" => ChartKind::Bar,
        other => {
            app.set_status(format!("Unknown chart type '{other}'. Use line or bar"));
            return Ok(());
        }
    };
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, tracker: &mut Store) -> anyhow::Result<()> {
    if args.is_empty() {
        app.entry_filter = None;
        app.refresh(tracker);
        app.set_status("Showing all categories");
        return Ok(());
    }

    match Category::resolve(tracker.categories(), args) {
        Some(category) => {
            app.entry_filter = Some(category.id);
            app.set_status(format!("Filtered to {}", category.name));
            app.screen = Screen::Entries;
            app.entry_index = 0;
            app.entry_scroll = 0;
            app.refresh(tracker);
        }
        None => app.set_status(format!("Category '{args}' not found")),
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
