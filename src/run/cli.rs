use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::config::Config;
use crate::db::Database;
use crate::engine::Calculation;
use crate::export::export_to_path;
use crate::models::Month;
use crate::session::{Session, YearSource};
use crate::ui::util::{expand_home, format_amount, parse_days, parse_price};

pub(crate) fn as_cli(
    args: &[String],
    config: &Config,
    current_year: i32,
    db: &mut Database,
) -> Result<()> {
    let cli = Cli {
        config,
        current_year,
    };
    match args[1].as_str() {
        "show" => cli.show(&args[2..], db),
        "summary" | "s" => cli.summary(&args[2..], db),
        "set" => cli.set(&args[2..], db),
        "price" => cli.price(&args[2..], db),
        "export" => cli.export(&args[2..], db),
        "years" => cli_years(db),
        "delete" => cli.delete(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("milkpay {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("milkpay: yearly milk delivery and payment table");
    println!();
    println!("Usage: milkpay [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  show [YEAR]                   Print the month table (default: current year)");
    println!("  summary [YEAR]                Print yearly totals");
    println!("  set <YEAR> <MONTH> <DAYS>     Record days not delivered and save");
    println!("  price <YEAR> <PRICE>          Set the price per kg and save");
    println!("  export <PATH> [YEAR]          Export to .csv or .json");
    println!("  years                         List years with saved tables");
    println!("  delete <YEAR>                 Delete a saved year");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("MONTH accepts 1-12 or a name such as jan or january.");
}

struct Cli<'a> {
    config: &'a Config,
    current_year: i32,
}

impl Cli<'_> {
    fn year_arg(&self, arg: Option<&String>) -> Result<i32> {
        match arg {
            Some(s) => s
                .trim()
                .parse::<i32>()
                .with_context(|| format!("Invalid year: {s}")),
            None => Ok(self.current_year),
        }
    }

    fn open(&self, year: i32, db: &Database) -> Result<(Session, YearSource)> {
        Ok(Session::open(self.config.clone(), year, db)?)
    }

    fn show(&self, args: &[String], db: &mut Database) -> Result<()> {
        let year = self.year_arg(args.first())?;
        let (session, source) = self.open(year, db)?;
        if source == YearSource::Fresh {
            println!("(no saved table for {year}, showing defaults)");
        }
        print!("{}", format_table(session.calculation()));
        Ok(())
    }

    fn summary(&self, args: &[String], db: &mut Database) -> Result<()> {
        let year = self.year_arg(args.first())?;
        let (session, _) = self.open(year, db)?;
        print!("{}", format_summary(session.calculation()));
        Ok(())
    }

    fn set(&self, args: &[String], db: &mut Database) -> Result<()> {
        let [year, month, days] = args else {
            anyhow::bail!("Usage: milkpay set <YEAR> <MONTH> <DAYS>");
        };
        let year = self.year_arg(Some(year))?;
        let month = Month::parse(month).with_context(|| format!("Unknown month: {month}"))?;
        let days = parse_days(days)?;

        let (mut session, _) = self.open(year, db)?;
        let stored = session.set_not_delivered(month, days)?;
        session.save(db)?;

        let row = session.table().row(month);
        if i64::from(stored) != days {
            println!("{days} is out of range for {month}, recorded {stored}");
        }
        println!(
            "{}: {} not delivered, {} delivered, {}",
            row.label(),
            row.not_delivered(),
            row.delivered(),
            format_amount(row.amount())
        );
        Ok(())
    }

    fn price(&self, args: &[String], db: &mut Database) -> Result<()> {
        let [year, price] = args else {
            anyhow::bail!("Usage: milkpay price <YEAR> <PRICE>");
        };
        let year = self.year_arg(Some(year))?;
        let price = parse_price(price)?;

        let (mut session, _) = self.open(year, db)?;
        session.set_price(price)?;
        session.save(db)?;

        println!(
            "{year}: {}/kg, total {}",
            format_amount(price),
            format_amount(session.summary().total_amount)
        );
        Ok(())
    }

    fn export(&self, args: &[String], db: &mut Database) -> Result<()> {
        let Some(path) = args.first() else {
            anyhow::bail!("Usage: milkpay export <PATH> [YEAR]");
        };
        let year = self.year_arg(args.get(1))?;
        let (session, _) = self.open(year, db)?;

        let expanded = expand_home(path);
        let format = export_to_path(session.calculation(), Path::new(&expanded))?;
        println!("Exported {year} as {format} to {expanded}");
        Ok(())
    }

    fn delete(&self, args: &[String], db: &mut Database) -> Result<()> {
        let Some(arg) = args.first() else {
            anyhow::bail!("Usage: milkpay delete <YEAR>");
        };
        let year = self.year_arg(Some(arg))?;
        if db.delete_year(year)? {
            println!("Deleted saved table for {year}");
        } else {
            println!("No saved table for {year}");
        }
        Ok(())
    }
}

fn cli_years(db: &mut Database) -> Result<()> {
    let years = db.saved_years()?;
    if years.is_empty() {
        println!("No saved tables");
        return Ok(());
    }
    for year in years {
        println!("{year}");
    }
    Ok(())
}

pub(crate) fn format_table(calc: &Calculation) -> String {
    let mut out = String::new();
    let table = &calc.table;
    let summary = &calc.summary;

    let _ = writeln!(out, "Milk Delivery {}", table.year());
    let _ = writeln!(
        out,
        "{:<8} {:>4} {:>12} {:>13} {:>9} {:>14}",
        "Month", "Days", "Price/kg", "Not Delivered", "Delivered", "Amount"
    );
    let _ = writeln!(out, "{}", "─".repeat(65));
    for row in table.rows() {
        let _ = writeln!(
            out,
            "{:<8} {:>4} {:>12} {:>13} {:>9} {:>14}",
            row.label(),
            row.days_in_month(),
            format_amount(row.price_per_kg()),
            row.not_delivered(),
            row.delivered(),
            format_amount(row.amount()),
        );
    }
    let _ = writeln!(out, "{}", "─".repeat(65));
    let _ = writeln!(
        out,
        "{:<8} {:>4} {:>12} {:>13} {:>9} {:>14}",
        "Total",
        summary.total_delivered + summary.total_not_delivered,
        format_amount(summary.average_price),
        summary.total_not_delivered,
        summary.total_delivered,
        format_amount(summary.total_amount),
    );
    out
}

pub(crate) fn format_summary(calc: &Calculation) -> String {
    let summary = &calc.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Milk Delivery {}", calc.table.year());
    let _ = writeln!(out, "{}", "─".repeat(40));
    let _ = writeln!(out, "  Total Annual Payment: {}", format_amount(summary.total_amount));
    let _ = writeln!(out, "  Delivered Days:       {}", summary.total_delivered);
    let _ = writeln!(out, "  Not Delivered Days:   {}", summary.total_not_delivered);
    let _ = writeln!(out, "  Avg Price per Kg:     {}", format_amount(summary.average_price));
    let _ = writeln!(
        out,
        "  Avg Monthly Payment:  {}",
        format_amount(summary.average_monthly_amount)
    );
    out
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
