use rust_decimal::Decimal;
use std::str::FromStr;

use crate::aggregate::{self, CategoryTotal, ChartData};
use crate::db::KeyValueStore;
use crate::models::{Category, CategoryId, Entry, YearMonth};
use crate::store::Tracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Entries,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Entries, Self::Categories]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Entries => write!(f, "Entries"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "ENTRY"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Line => Self::Bar,
            Self::Bar => Self::Line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Value,
    Note,
}

/// The new-entry form. Value is kept as typed until submit.
#[derive(Debug, Clone)]
pub(crate) struct EntryForm {
    pub(crate) category_id: CategoryId,
    pub(crate) value: String,
    pub(crate) note: String,
    pub(crate) field: FormField,
}

impl EntryForm {
    fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            value: String::new(),
            note: String::new(),
            field: FormField::Value,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Value => FormField::Note,
            FormField::Note => FormField::Value,
        };
    }

    pub(crate) fn push(&mut self, c: char) {
        match self.field {
            FormField::Value => {
                if c.is_ascii_digit() || c == '.' || (c == '-' && self.value.is_empty()) {
                    self.value.push(c);
                }
            }
            FormField::Note => self.note.push(c),
        }
    }

    pub(crate) fn pop(&mut self) {
        match self.field {
            FormField::Value => self.value.pop(),
            FormField::Note => self.note.pop(),
        };
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) selected_month: YearMonth,

    // Dashboard
    pub(crate) summary: Vec<CategoryTotal>,
    pub(crate) breakdown: Vec<Decimal>,
    pub(crate) chart: ChartData,
    pub(crate) chart_kind: ChartKind,

    // Categories (also drives the highlighted dashboard card)
    pub(crate) categories: Vec<Category>,
    pub(crate) category_index: usize,

    // Entries
    pub(crate) entries: Vec<Entry>,
    pub(crate) entry_index: usize,
    pub(crate) entry_scroll: usize,
    pub(crate) entry_filter: Option<CategoryId>,

    pub(crate) form: Option<EntryForm>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new<S: KeyValueStore>(tracker: &Tracker<S>) -> Self {
        let mut app = Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            selected_month: tracker.selected(),

            summary: Vec::new(),
            breakdown: Vec::new(),
            chart: ChartData {
                labels: Vec::new(),
                datasets: Vec::new(),
            },
            chart_kind: ChartKind::Line,

            categories: Vec::new(),
            category_index: 0,

            entries: Vec::new(),
            entry_index: 0,
            entry_scroll: 0,
            entry_filter: None,

            form: None,

            visible_rows: 20,
        };
        app.refresh(tracker);
        app
    }

    /// Re-read every derived view from the tracker.
    pub(crate) fn refresh<S: KeyValueStore>(&mut self, tracker: &Tracker<S>) {
        self.selected_month = tracker.selected();
        self.categories = tracker.categories().to_vec();
        self.summary = tracker.get_monthly_summary();
        self.breakdown = aggregate::percentage_breakdown(&self.summary);
        self.chart = tracker.get_chart_data();

        if self
            .entry_filter
            .is_some_and(|id| tracker.get_category_by_id(id).is_none())
        {
            self.entry_filter = None;
        }
        let mut entries = match self.entry_filter {
            Some(id) => tracker.get_entries_by_category(id),
            None => tracker.selected_entries().to_vec(),
        };
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.entries = entries;

        if self.category_index >= self.categories.len() {
            self.category_index = self.categories.len().saturating_sub(1);
        }
        if self.entry_index >= self.entries.len() {
            self.entry_index = self.entries.len().saturating_sub(1);
            self.entry_scroll = self.entry_scroll.min(self.entry_index);
        }
    }

    pub(crate) fn highlighted_category(&self) -> Option<&Category> {
        self.categories.get(self.category_index)
    }

    pub(crate) fn category_name(&self, id: CategoryId) -> &str {
        Category::find_by_id(&self.categories, id).map_or("(unknown)", |c| c.name.as_str())
    }

    /// Open the entry form, preselecting `category_id` or the highlighted card.
    pub(crate) fn open_form(&mut self, category_id: Option<CategoryId>) {
        let Some(id) = category_id.or_else(|| self.highlighted_category().map(|c| c.id)) else {
            self.set_status("No categories yet. Create one with :category <name>");
            return;
        };
        self.form = Some(EntryForm::new(id));
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Step the form's category through the list.
    pub(crate) fn cycle_form_category(&mut self, delta: isize) {
        let len = self.categories.len();
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if len == 0 {
            return;
        }
        let current = self
            .categories
            .iter()
            .position(|c| c.id == form.category_id)
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(len as isize) as usize;
        form.category_id = self.categories[next].id;
    }

    /// Validate the form and record the entry. The form stays open on a
    /// missing or unparseable value.
    pub(crate) fn submit_form<S: KeyValueStore>(&mut self, tracker: &mut Tracker<S>) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let raw = form.value.trim().to_string();
        let category_id = form.category_id;
        let note = form.note.trim().to_string();
        if raw.is_empty() {
            self.set_status("A value is required");
            return;
        }
        let Ok(value) = Decimal::from_str(&raw) else {
            self.set_status(format!("Invalid value '{raw}'"));
            return;
        };

        match tracker.add_entry(category_id, value, &note) {
            Ok(entry) => {
                self.close_form();
                self.refresh(tracker);
                let name = self.category_name(category_id).to_string();
                self.set_status(format!(
                    "Added {} to {name}",
                    super::util::format_value(entry.value)
                ));
            }
            Err(e) => {
                self.close_form();
                self.set_status(format!("Could not add entry: {e}"));
            }
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
