use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
        List, ListItem, Paragraph,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::CategoryTotal;
use crate::ui::app::{App, ChartKind};
use crate::ui::theme;
use crate::ui::util::{category_color, format_value, icon_glyph, truncate};

const CARD_MIN_WIDTH: u16 = 18;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.summary.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :category <name> [#color] [icon]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel(app.selected_month.label()));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Category cards
            Constraint::Min(10),   // Chart + breakdown
        ])
        .split(area);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[1]);

    render_category_cards(f, chunks[0], app);
    match app.chart_kind {
        ChartKind::Line => render_line_chart(f, lower[0], app),
        ChartKind::Bar => render_bar_chart(f, lower[0], app),
    }
    render_breakdown(f, lower[1], app);
}

// ── Cards ────────────────────────────────────────────────────

fn render_category_cards(f: &mut Frame, area: Rect, app: &App) {
    let total = app.summary.len();
    let fit = usize::from((area.width / CARD_MIN_WIDTH).max(1));
    let visible = total.min(fit);
    // Keep the highlighted card in view
    let start = (app.category_index + 1).saturating_sub(visible);

    let constraints: Vec<Constraint> = (0..visible)
        .map(|_| Constraint::Ratio(1, visible as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (slot, (i, item)) in app
        .summary
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .enumerate()
    {
        render_card(f, cells[slot], item, i == app.category_index);
    }
}

fn render_card(f: &mut Frame, area: Rect, item: &CategoryTotal, highlighted: bool) {
    let color = category_color(&item.category.color);
    let title = format!(
        " {} {} ",
        icon_glyph(&item.category.icon),
        truncate(&item.category.name, area.width.saturating_sub(6) as usize)
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if highlighted {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(if highlighted { color } else { theme::OVERLAY }))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let count = match item.entry_count {
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    };

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_value(item.total_value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(count, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

// ── Charts ───────────────────────────────────────────────────

fn render_empty_chart(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No months recorded yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Press a to record the first entry",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(theme::panel("Monthly Totals"));
    f.render_widget(msg, area);
}

fn render_line_chart(f: &mut Frame, area: Rect, app: &App) {
    let labels = &app.chart.labels;
    if labels.is_empty() {
        render_empty_chart(f, area);
        return;
    }

    let series: Vec<Vec<(f64, f64)>> = app
        .chart
        .datasets
        .iter()
        .map(|d| {
            d.data
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, v.to_f64().unwrap_or(0.0)))
                .collect()
        })
        .collect();

    let (y_min, y_max) = series
        .iter()
        .flatten()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let y_max = if y_max <= y_min { y_min + 1.0 } else { y_max * 1.1 };

    // A single month has nothing to connect
    let graph_type = if labels.len() == 1 {
        GraphType::Scatter
    } else {
        GraphType::Line
    };

    let datasets: Vec<Dataset> = app
        .chart
        .datasets
        .iter()
        .zip(&series)
        .map(|(d, points)| {
            Dataset::default()
                .name(d.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(category_color(&d.color)))
                .data(points)
        })
        .collect();

    let x_labels: Vec<Span> = axis_labels(labels)
        .into_iter()
        .map(|l| Span::styled(l, theme::dim_style()))
        .collect();
    let y_labels: Vec<Span> = [y_min, (y_min + y_max) / 2.0, y_max]
        .iter()
        .map(|v| Span::styled(format!("{v:.0}"), theme::dim_style()))
        .collect();

    let chart = Chart::new(datasets)
        .block(theme::panel("Monthly Totals (line)"))
        .x_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([0.0, (labels.len().max(2) - 1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

/// Every label when they fit, otherwise the first, middle and last.
fn axis_labels(labels: &[String]) -> Vec<String> {
    if labels.len() <= 6 {
        return labels.to_vec();
    }
    let mid = labels.len() / 2;
    [0, mid, labels.len() - 1]
        .iter()
        .filter_map(|&i| labels.get(i).cloned())
        .collect()
}

fn render_bar_chart(f: &mut Frame, area: Rect, app: &App) {
    let labels = &app.chart.labels;
    if labels.is_empty() {
        render_empty_chart(f, area);
        return;
    }

    let per_group = app.chart.datasets.len().max(1) as u16;
    let inner_width = area.width.saturating_sub(2);
    let group_width = inner_width / labels.len() as u16;
    let bar_width = (group_width.saturating_sub(1) / per_group).clamp(1, 5);

    let mut chart = BarChart::default()
        .block(theme::panel("Monthly Totals (bar)"))
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1)
        .value_style(Style::default().fg(theme::TEXT));

    for (i, label) in labels.iter().enumerate() {
        let bars: Vec<Bar> = app
            .chart
            .datasets
            .iter()
            .map(|d| {
                let value = d.data.get(i).copied().unwrap_or(Decimal::ZERO);
                let color = category_color(&d.color);
                Bar::default()
                    .value(value.round().to_u64().unwrap_or(0))
                    .text_value(String::new())
                    .style(Style::default().fg(color))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate(label, group_width as usize)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

// ── Breakdown ────────────────────────────────────────────────

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let name_width = 12;
    let bar_width = (area.width as usize).saturating_sub(name_width + 12).max(4);

    let items: Vec<ListItem> = app
        .summary
        .iter()
        .zip(&app.breakdown)
        .map(|(item, pct)| {
            let color = category_color(&item.category.color);
            let ratio = (pct.to_f64().unwrap_or(0.0) / 100.0).clamp(0.0, 1.0);
            let name = truncate(&item.category.name, name_width - 2);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} {name:<width$}", icon_glyph(&item.category.icon), width = name_width - 2),
                    theme::normal_style(),
                ),
                Span::styled(create_progress_bar(ratio, bar_width), Style::default().fg(color)),
                Span::styled(
                    format!(" {:>3}%", pct.to_string()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(theme::panel(format!(
        "Breakdown {}",
        app.selected_month.label()
    )));
    f.render_widget(list, area);
}

fn create_progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
