use anyhow::{Context, Result};
use std::io;

use crate::engine::Calculation;

pub(crate) const CSV_HEADERS: [&str; 6] = [
    "Month",
    "Days",
    "Price per Kg (Rs)",
    "Not Delivered",
    "Delivered",
    "Amount (Rs)",
];

/// One line per month, in calendar order. Returns the number of data rows.
pub(crate) fn write_csv<W: io::Write>(calc: &Calculation, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    let rows = calc.table.rows();
    for row in rows {
        wtr.write_record([
            row.label().to_string(),
            row.days_in_month().to_string(),
            row.price_per_kg().to_string(),
            row.not_delivered().to_string(),
            row.delivered().to_string(),
            row.amount().to_string(),
        ])
        .with_context(|| format!("Failed to write CSV row for {}", row.label()))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(rows.len())
}
