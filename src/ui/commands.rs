use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use super::util::{expand_home, format_amount, parse_days, parse_price};
use crate::db::Database;
use crate::export::{default_export_path, export_to_path, ExportFormat};
use crate::models::Month;
use crate::session::YearSource;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
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

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("t", "Go to Table", cmd_table, r);
    register_command!("table", "Go to Table", cmd_table, r);
    register_command!("c", "Go to Analytics", cmd_charts, r);
    register_command!("charts", "Go to Analytics", cmd_charts, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("y", "Select year (e.g. :y 2024)", cmd_year, r);
    register_command!("year", "Select year (e.g. :year 2024)", cmd_year, r);
    register_command!("next-year", "Go to next year", cmd_next_year, r);
    register_command!("prev-year", "Go to previous year", cmd_prev_year, r);
    register_command!("p", "Set price per kg (e.g. :p 60)", cmd_price, r);
    register_command!("price", "Set price per kg (e.g. :price 60)", cmd_price, r);
    register_command!(
        "nd",
        "Set days not delivered (e.g. :nd may 12, or :nd 12 for the selected month)",
        cmd_not_delivered,
        r
    );
    register_command!("w", "Save this year's table", cmd_save, r);
    register_command!("save", "Save this year's table", cmd_save, r);
    register_command!("e", "Reload this year's saved table", cmd_load, r);
    register_command!("load", "Reload this year's saved table", cmd_load, r);
    register_command!("reset", "Reset to default price and full delivery", cmd_reset, r);
    register_command!(
        "x",
        "Export table (e.g. :x json, :x ~/milk.csv)",
        cmd_export,
        r
    );
    register_command!(
        "export",
        "Export table (e.g. :export json, :export ~/milk.csv)",
        cmd_export,
        r
    );
    register_command!("years", "List years with saved tables", cmd_years, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
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
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (levenshtein(input, k), **k))
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
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Shared actions ───────────────────────────────────────────

/// Switch years, asking first when the current table has unsaved edits.
pub(crate) fn request_year(app: &mut App, db: &mut Database, year: i32) -> anyhow::Result<()> {
    if year == app.session.year() {
        app.set_status(format!("Already on {year}"));
        return Ok(());
    }
    if app.session.is_dirty() {
        let current = app.session.year();
        app.confirm(
            format!("Discard unsaved changes to {current} and open {year}?"),
            PendingAction::SwitchYear(year),
        );
        return Ok(());
    }
    switch_year(app, db, year)
}

pub(crate) fn switch_year(app: &mut App, db: &mut Database, year: i32) -> anyhow::Result<()> {
    match app.session.select_year(year, db) {
        Ok(YearSource::Saved) => app.set_status(format!("Loaded saved table for {year}")),
        Ok(YearSource::Fresh) => app.set_status(format!("New table for {year}")),
        Err(e) => app.report(&e),
    }
    Ok(())
}

pub(crate) fn reload(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year();
    match app.session.reload(db) {
        Ok(true) => app.set_status(format!("Loaded saved table for {year}")),
        Ok(false) => app.set_status(format!("No saved table for {year}")),
        Err(e) => app.report(&e),
    }
    Ok(())
}

pub(crate) fn reset(app: &mut App) -> anyhow::Result<()> {
    match app.session.reset() {
        Ok(()) => {
            let year = app.session.year();
            app.set_status(format!("Table reset for {year}"));
        }
        Err(e) => app.report(&e),
    }
    Ok(())
}

pub(crate) fn set_not_delivered(app: &mut App, month: Month, value: i64) {
    match app.session.set_not_delivered(month, value) {
        Ok(stored) if i64::from(stored) != value => {
            app.set_status(format!(
                "{month}: {value} is out of range, set to {stored} days not delivered"
            ));
        }
        Ok(stored) => app.set_status(format!("{month}: {stored} days not delivered")),
        Err(e) => app.report(&e),
    }
}

pub(crate) fn adjust_not_delivered(app: &mut App, delta: i64) {
    let month = app.selected_month();
    if let Err(e) = app.session.adjust_not_delivered(month, delta) {
        app.report(&e);
    }
}

pub(crate) fn adjust_price(app: &mut App, delta: rust_decimal::Decimal) {
    let Some(price) = app.session.price_per_kg().checked_add(delta) else {
        app.set_status("Price per kg is too large");
        return;
    };
    match app.session.set_price(price) {
        Ok(()) => app.set_status(format!("Price per kg: {}", format_amount(price))),
        Err(e) => app.report(&e),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_table(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Table;
    Ok(())
}

fn cmd_charts(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Analytics;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<i32>() {
        Ok(year) => request_year(app, db, year),
        Err(_) => {
            let config = app.session.config();
            let msg = format!(
                "Usage: :year <YYYY> ({} to {})",
                config.min_year, config.max_year
            );
            app.set_status(msg);
            Ok(())
        }
    }
}

fn cmd_next_year(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year() + 1;
    request_year(app, db, year)
}

fn cmd_prev_year(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year() - 1;
    request_year(app, db, year)
}

fn cmd_price(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :price <amount>. Example: :price 60");
        return Ok(());
    }

    let price = match parse_price(args) {
        Ok(p) => p,
        Err(_) => {
            app.set_status(format!("Invalid price: {args}"));
            return Ok(());
        }
    };

    match app.session.set_price(price) {
        Ok(()) => app.set_status(format!("Price per kg: {}", format_amount(price))),
        Err(e) => app.report(&e),
    }
    Ok(())
}

fn cmd_not_delivered(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let (month, days_str) = match parts.as_slice() {
        [days] => (Some(app.selected_month()), *days),
        [month, days] => (Month::parse(month), *days),
        _ => {
            app.set_status("Usage: :nd [month] <days>. Example: :nd may 12");
            return Ok(());
        }
    };

    let Some(month) = month else {
        app.set_status(format!("Unknown month: {}", parts[0]));
        return Ok(());
    };
    let days = match parse_days(days_str) {
        Ok(d) => d,
        Err(_) => {
            app.set_status(format!("Invalid number of days: {days_str}"));
            return Ok(());
        }
    };

    app.select_month(month);
    set_not_delivered(app, month, days);
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year();
    match app.session.save(db) {
        Ok(()) => app.set_status(format!("Saved table for {year}")),
        Err(e) => app.report(&e),
    }
    Ok(())
}

fn cmd_load(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.session.is_dirty() {
        let year = app.session.year();
        app.confirm(
            format!("Discard unsaved changes and reload {year}?"),
            PendingAction::Reload,
        );
        return Ok(());
    }
    reload(app, db)
}

fn cmd_reset(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year();
    app.confirm(
        format!("Reset {year} to the default price with no missed days?"),
        PendingAction::Reset,
    );
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let year = app.session.year();
    let path = match args.to_ascii_lowercase().as_str() {
        "" | "csv" => default_export_path(&app.export_dir, year, ExportFormat::Csv),
        "json" => default_export_path(&app.export_dir, year, ExportFormat::Json),
        _ => PathBuf::from(expand_home(args)),
    };

    match export_to_path(app.session.calculation(), &path) {
        Ok(format) => app.set_status(format!("Exported {format} to {}", path.display())),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "export failed");
            app.set_status(format!("Export failed: {e:#}"));
        }
    }
    Ok(())
}

fn cmd_years(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match db.saved_years() {
        Ok(years) if years.is_empty() => app.set_status("No saved tables"),
        Ok(years) => {
            let list: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            app.set_status(format!("Saved: {}", list.join(", ")));
        }
        Err(e) => app.set_status(format!("Could not list saved tables: {e:#}")),
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
