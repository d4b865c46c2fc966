use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{category_color, format_value, icon_glyph, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :category <name> [#color] [icon]",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "e.g. :category Sleep #8b5cf6 moon",
                Style::default().fg(theme::ACCENT),
            )),
        ])
        .centered()
        .block(theme::panel("Categories (0)"));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_category_table(f, chunks[0], app);
    render_category_detail(f, chunks[1], app);
}

fn render_category_table(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["ID", "Category", "Color", "Entries", "Total"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .summary
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let cat = &item.category;
            let color = category_color(&cat.color);
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(cat.id.to_string()),
                Cell::from(Line::from(vec![
                    Span::styled(format!("{} ", icon_glyph(&cat.icon)), Style::default().fg(color)),
                    Span::raw(truncate(&cat.name, 18)),
                ])),
                Cell::from(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(color)),
                    Span::raw(cat.color.as_str()),
                ])),
                Cell::from(Line::from(item.entry_count.to_string()).right_aligned()),
                Cell::from(Line::from(format_value(item.total_value)).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                format!(
                    " Categories ({}) | {} ",
                    app.categories.len(),
                    app.selected_month.label()
                ),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

fn render_category_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(item) = app.summary.get(app.category_index) else {
        return;
    };
    let cat = &item.category;
    let color = category_color(&cat.color);
    let share = app
        .breakdown
        .get(app.category_index)
        .map_or_else(|| "0".to_string(), |p| p.to_string());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(area);

    let detail = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {} {}", icon_glyph(&cat.icon), cat.name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  #{}", cat.id), theme::dim_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total     ", theme::dim_style()),
            Span::styled(format_value(item.total_value), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("  Entries   ", theme::dim_style()),
            Span::styled(item.entry_count.to_string(), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("  Share     ", theme::dim_style()),
            Span::styled(format!("{share}%"), theme::normal_style()),
        ]),
        Line::from(Span::styled(
            "  a add entry · f show entries",
            theme::dim_style(),
        )),
    ])
    .block(theme::panel(app.selected_month.label()));
    f.render_widget(detail, chunks[0]);

    // Series across every recorded month, matched by position in the chart
    let data: Vec<u64> = app
        .chart
        .datasets
        .get(app.category_index)
        .map(|d| {
            d.data
                .iter()
                .map(|v| v.round().to_u64().unwrap_or(0))
                .collect()
        })
        .unwrap_or_default();

    let sparkline = Sparkline::default()
        .block(theme::panel(format!("{} per month", cat.name)))
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(sparkline, chunks[1]);
}
