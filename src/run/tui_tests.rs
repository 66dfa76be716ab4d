#![allow(clippy::unwrap_used)]

use crossterm::event::{KeyEvent, KeyModifiers};
use rust_decimal_macros::dec;

use super::*;
use crate::config::Config;
use crate::models::Month;

fn setup() -> (App, Database, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Config::default(), 2024).unwrap();
    let app = App::new(session, dir.path().to_path_buf());
    (app, Database::open_in_memory().unwrap(), dir)
}

fn press(app: &mut App, db: &mut Database, code: KeyCode) {
    handle_key(KeyEvent::new(code, KeyModifiers::NONE), app, db).unwrap();
}

fn type_str(app: &mut App, db: &mut Database, text: &str) {
    for c in text.chars() {
        press(app, db, KeyCode::Char(c));
    }
}

#[test]
fn test_navigation_and_adjust() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('j'));
    press(&mut app, &mut db, KeyCode::Char('+'));
    press(&mut app, &mut db, KeyCode::Char('+'));
    press(&mut app, &mut db, KeyCode::Char('-'));
    assert_eq!(app.selected_month(), Month::February);
    assert_eq!(app.session.table().row(Month::February).not_delivered(), 1);
    assert_eq!(app.session.table().row(Month::February).delivered(), 28);

    press(&mut app, &mut db, KeyCode::Char('G'));
    assert_eq!(app.selected_month(), Month::December);
    press(&mut app, &mut db, KeyCode::Char('g'));
    assert_eq!(app.selected_month(), Month::January);
}

#[test]
fn test_minus_never_goes_negative() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('-'));
    assert_eq!(app.session.table().row(Month::January).not_delivered(), 0);
    assert!(!app.session.is_dirty());
}

#[test]
fn test_price_keys() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char(']'));
    press(&mut app, &mut db, KeyCode::Char(']'));
    press(&mut app, &mut db, KeyCode::Char('['));
    assert_eq!(app.session.price_per_kg(), dec!(56));
}

#[test]
fn test_enter_edits_selected_month() {
    let (mut app, mut db, _dir) = setup();
    for _ in 0..4 {
        press(&mut app, &mut db, KeyCode::Down);
    }
    press(&mut app, &mut db, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "0");

    press(&mut app, &mut db, KeyCode::Backspace);
    type_str(&mut app, &mut db, "12");
    press(&mut app, &mut db, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    let may = app.session.table().row(Month::May);
    assert_eq!(may.not_delivered(), 12);
    assert_eq!(may.delivered(), 19);
}

#[test]
fn test_edit_escape_cancels() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Enter);
    type_str(&mut app, &mut db, "9");
    press(&mut app, &mut db, KeyCode::Esc);
    assert_eq!(app.session.table().row(Month::January).not_delivered(), 0);
    assert_eq!(app.status_message, "Edit cancelled");
}

#[test]
fn test_command_mode_runs_command() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char(':'));
    type_str(&mut app, &mut db, "price 60");
    press(&mut app, &mut db, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.session.summary().total_amount, dec!(21960));
}

#[test]
fn test_screen_switching() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('2'));
    assert_eq!(app.screen, Screen::Analytics);
    press(&mut app, &mut db, KeyCode::Tab);
    assert_eq!(app.screen, Screen::Table);
}

#[test]
fn test_dirty_year_switch_confirm_and_cancel() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('+'));
    press(&mut app, &mut db, KeyCode::Char('L'));
    assert_eq!(app.input_mode, InputMode::Confirm);

    press(&mut app, &mut db, KeyCode::Char('n'));
    assert_eq!(app.session.year(), 2024);
    assert_eq!(app.status_message, "Cancelled");

    press(&mut app, &mut db, KeyCode::Char('L'));
    press(&mut app, &mut db, KeyCode::Char('y'));
    assert_eq!(app.session.year(), 2025);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
}

#[test]
fn test_reset_confirmed() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('+'));
    press(&mut app, &mut db, KeyCode::Char(':'));
    type_str(&mut app, &mut db, "reset");
    press(&mut app, &mut db, KeyCode::Enter);
    press(&mut app, &mut db, KeyCode::Char('y'));
    assert_eq!(app.session.summary().total_not_delivered, 0);
}

#[test]
fn test_help_swallows_next_key() {
    let (mut app, mut db, _dir) = setup();
    press(&mut app, &mut db, KeyCode::Char('?'));
    assert!(app.show_help);
    press(&mut app, &mut db, KeyCode::Char('j'));
    assert!(!app.show_help);
    assert_eq!(app.selected_month(), Month::January);
}

#[test]
fn test_ctrl_q_quits() {
    let (mut app, mut db, _dir) = setup();
    handle_key(
        KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        &mut app,
        &mut db,
    )
    .unwrap();
    assert!(!app.running);
}

#[test]
fn test_startup_status_reports_unreadable_save() {
    let err = EngineError::OutOfRangeInput {
        month: "February".into(),
        value: 40,
        days: 28,
    };
    let status = startup_status(2023, YearSource::Fresh, Some(&err));
    assert!(status.starts_with("Could not load saved table for 2023"));
    assert!(status.contains("got 40"));

    assert_eq!(
        startup_status(2024, YearSource::Saved, None),
        "Loaded saved table for 2024"
    );
    assert_eq!(
        startup_status(2024, YearSource::Fresh, None),
        "New table for 2024"
    );
}
