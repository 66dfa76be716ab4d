use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;

use crate::db::Database;
use crate::engine::EngineError;
use crate::session::{Session, YearSource};
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{parse_days, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(
    session: Session,
    source: YearSource,
    load_error: Option<EngineError>,
    export_dir: PathBuf,
    db: &mut Database,
) -> Result<()> {
    let mut app = App::new(session, export_dir);
    app.set_status(startup_status(app.session.year(), source, load_error.as_ref()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "terminal ui stopped");
        eprintln!("Error: {e:?}");
    }

    result
}

fn startup_status(year: i32, source: YearSource, load_error: Option<&EngineError>) -> String {
    match (load_error, source) {
        (Some(err), _) => {
            format!("Could not load saved table for {year}, showing a new one: {err}")
        }
        (None, YearSource::Saved) => format!("Loaded saved table for {year}"),
        (None, YearSource::Fresh) => format!("New table for {year}"),
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab, status and command bars, grid borders, header, totals, cards
            let content_height = f.area().height.saturating_sub(12) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, db)?;
        }
    }
    Ok(())
}

fn handle_key(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, db),
        InputMode::Command => handle_command_input(key, app, db),
        InputMode::Editing => handle_editing_input(key, app),
        InputMode::Confirm => handle_confirm_input(key, app, db),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
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
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            commands::handle_command("save", app, db)?;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            scroll_down(&mut app.month_index, &mut app.month_scroll, 12, app.visible_rows);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            scroll_up(&mut app.month_index, &mut app.month_scroll);
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.month_index, &mut app.month_scroll),
        KeyCode::Char('G') => {
            scroll_to_bottom(&mut app.month_index, &mut app.month_scroll, 12, app.visible_rows);
        }
        KeyCode::Char('1') => app.screen = Screen::Table,
        KeyCode::Char('2') => app.screen = Screen::Analytics,
        KeyCode::Tab | KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[(idx + 1) % screens.len()];
        }
        KeyCode::Enter => {
            let current = app.session.table().row(app.selected_month()).not_delivered();
            app.command_input = current.to_string();
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => commands::adjust_not_delivered(app, 1),
        KeyCode::Char('-') => commands::adjust_not_delivered(app, -1),
        KeyCode::Char(']') => commands::adjust_price(app, Decimal::ONE),
        KeyCode::Char('[') => commands::adjust_price(app, -Decimal::ONE),
        KeyCode::Char('H') => commands::handle_command("prev-year", app, db)?,
        KeyCode::Char('L') => commands::handle_command("next-year", app, db)?,
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
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

fn handle_editing_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            match parse_days(&input) {
                Ok(days) => {
                    let month = app.selected_month();
                    commands::set_not_delivered(app, month, days);
                }
                Err(_) => app.set_status(format!("Invalid number of days: {}", input.trim())),
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    let action = app.pending_action.take();

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => match action {
            Some(PendingAction::Reset) => commands::reset(app)?,
            Some(PendingAction::SwitchYear(year)) => commands::switch_year(app, db, year)?,
            Some(PendingAction::Reload) => commands::reload(app, db)?,
            None => {}
        },
        _ => app.set_status("Cancelled"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
