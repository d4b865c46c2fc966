use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::Category;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{category_color, format_value, icon_glyph, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let scope = match app.entry_filter {
        Some(id) => format!("{} · {}", app.category_name(id), app.selected_month.label()),
        None => app.selected_month.label(),
    };

    if app.entries.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No entries for this month",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add one or H/L to change month",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel(format!("Entries (0) | {scope}")));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Date", "Category", "Value", "Note"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .entries
        .iter()
        .enumerate()
        .skip(app.entry_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, entry)| {
            let category = Category::find_by_id(&app.categories, entry.category_id);
            let (name, glyph, color) = category.map_or(("(unknown)", "•", theme::TEXT_DIM), |c| {
                (c.name.as_str(), icon_glyph(&c.icon), category_color(&c.color))
            });

            let style = if i == app.entry_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            // Entries recorded into another month keep their real date
            let date_style = if app.selected_month.contains(entry.date) {
                Style::default()
            } else {
                theme::dim_style()
            };

            Row::new(vec![
                Cell::from(entry.date.format("%Y-%m-%d").to_string()).style(date_style),
                Cell::from(Line::from(vec![
                    Span::styled(format!("{glyph} "), Style::default().fg(color)),
                    Span::raw(truncate(name, 16)),
                ])),
                Cell::from(Line::from(format_value(entry.value)).right_aligned()),
                Cell::from(entry.note.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(theme::panel(format!(
            "Entries ({}) | {scope}",
            app.entries.len()
        )));
    f.render_widget(table, area);
}
