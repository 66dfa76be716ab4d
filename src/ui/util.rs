use anyhow::{Context, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub(crate) const CURRENCY: &str = "Rs";

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.891` → `"Rs 1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-{CURRENCY} {with_commas}.{dec_part}")
    } else {
        format!("{CURRENCY} {with_commas}.{dec_part}")
    }
}

/// Whole-unit variant used on summary cards, e.g. `"Rs 20,130"`.
pub(crate) fn format_amount_whole(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let full = format_amount(rounded);
    full.strip_suffix(".00").map(str::to_string).unwrap_or(full)
}

/// Parse a price typed by the user. Accepts a leading `Rs`/`₹` and thousands
/// separators: `"Rs 1,055.50"` → `1055.50`.
pub(crate) fn parse_price(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    let without_unit = trimmed
        .strip_prefix(CURRENCY)
        .or_else(|| trimmed.strip_prefix('₹'))
        .unwrap_or(trimmed);
    let cleaned: String = without_unit
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        anyhow::bail!("Empty price");
    }
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid price: {s}"))
}

/// Parse a day count. Negative values are allowed here; the engine clamps them.
pub(crate) fn parse_days(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid number of days: {s}"))
}

/// Expand a leading `~/` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        let page = page.max(1);
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
