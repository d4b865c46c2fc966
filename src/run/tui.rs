use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use super::Store;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(tracker: &mut Store) -> Result<()> {
    let mut app = App::new(tracker);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, tracker);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("dashboard exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tracker: &mut Store,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, tracker)?,
                InputMode::Command => handle_command_input(key, app, tracker)?,
                InputMode::Form => handle_form_input(key, app, tracker),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, tracker: &mut Store) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Right if app.screen == Screen::Dashboard => handle_move_down(app),
        KeyCode::Left if app.screen == Screen::Dashboard => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, Screen::Entries),
        KeyCode::Char('3') => switch_screen(app, Screen::Categories),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Char('H') => change_month(app, tracker, -1),
        KeyCode::Char('L') => change_month(app, tracker, 1),
        KeyCode::Char('a') => {
            // On the entries screen the active filter picks the category
            let preset = match app.screen {
                Screen::Entries => app.entry_filter,
                _ => None,
            };
            app.open_form(preset);
        }
        KeyCode::Enter if app.screen != Screen::Entries => app.open_form(None),
        KeyCode::Char('t') if app.screen == Screen::Dashboard => {
            app.chart_kind = app.chart_kind.toggle();
        }
        KeyCode::Char('f') => toggle_filter(app, tracker),
        KeyCode::Esc => {
            if app.screen == Screen::Entries && app.entry_filter.is_some() {
                toggle_filter(app, tracker);
            } else {
                app.status_message.clear();
            }
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, tracker: &mut Store) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, tracker)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: KeyEvent, app: &mut App, tracker: &mut Store) {
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            app.set_status("Entry discarded");
        }
        KeyCode::Enter => app.submit_form(tracker),
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(form) = app.form.as_mut() {
                form.next_field();
            }
        }
        KeyCode::Up => app.cycle_form_category(-1),
        KeyCode::Down => app.cycle_form_category(1),
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                form.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.form.as_mut() {
                form.push(c);
            }
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

fn change_month(app: &mut App, tracker: &mut Store, delta: i32) {
    if delta > 0 {
        tracker.next_month();
    } else {
        tracker.prev_month();
    }
    scroll_to_top(&mut app.entry_index, &mut app.entry_scroll);
    app.refresh(tracker);
    app.set_status(format!("Month: {}", tracker.selected().label()));
}

/// On Categories, filter entries to the highlighted category. Elsewhere, clear
/// any active filter.
fn toggle_filter(app: &mut App, tracker: &mut Store) {
    if app.screen == Screen::Categories {
        let Some(category) = app.highlighted_category().cloned() else {
            return;
        };
        app.entry_filter = Some(category.id);
        app.screen = Screen::Entries;
        app.set_status(format!("Filtered to {}", category.name));
    } else if app.entry_filter.take().is_some() {
        app.set_status("Showing all categories");
    } else {
        return;
    }
    scroll_to_top(&mut app.entry_index, &mut app.entry_scroll);
    app.refresh(tracker);
}

fn entry_page(app: &App) -> usize {
    app.visible_rows.saturating_sub(3).max(1)
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Dashboard | Screen::Categories => {
            if app.category_index + 1 < app.categories.len() {
                app.category_index += 1;
            }
        }
        Screen::Entries => {
            let page = entry_page(app);
            scroll_down(
                &mut app.entry_index,
                &mut app.entry_scroll,
                app.entries.len(),
                page,
            );
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Dashboard | Screen::Categories => {
            app.category_index = app.category_index.saturating_sub(1);
        }
        Screen::Entries => scroll_up(&mut app.entry_index, &mut app.entry_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Dashboard | Screen::Categories => app.category_index = 0,
        Screen::Entries => scroll_to_top(&mut app.entry_index, &mut app.entry_scroll),
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Dashboard | Screen::Categories => {
            app.category_index = app.categories.len().saturating_sub(1);
        }
        Screen::Entries => {
            let page = entry_page(app);
            scroll_to_bottom(
                &mut app.entry_index,
                &mut app.entry_scroll,
                app.entries.len(),
                page,
            );
        }
    }
}
