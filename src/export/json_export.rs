use anyhow::{Context, Result};

use crate::engine::Calculation;

/// Pretty-printed record: year, price, the twelve rows and the summary.
/// Decimals are written as strings so nothing is lost to float conversion.
pub(crate) fn to_json(calc: &Calculation) -> Result<String> {
    serde_json::to_string_pretty(calc).context("Failed to serialize table to JSON")
}
