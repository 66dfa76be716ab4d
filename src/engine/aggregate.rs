use rust_decimal::Decimal;
use serde::Serialize;

use super::{EngineError, EngineResult, MonthRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub(crate) total_amount: Decimal,
    pub(crate) total_delivered: u32,
    pub(crate) total_not_delivered: u32,
    /// `total_amount / total_delivered`; the table price when nothing was delivered.
    pub(crate) average_price: Decimal,
    pub(crate) average_monthly_amount: Decimal,
}

/// Sum a full year of rows. Totals are exact; rounding is left to display code.
pub(crate) fn aggregate(rows: &[MonthRow]) -> EngineResult<Summary> {
    if rows.len() != 12 {
        return Err(EngineError::invalid(format!(
            "a table has 12 months, got {}",
            rows.len()
        )));
    }
    if let Some((i, row)) = rows
        .iter()
        .enumerate()
        .find(|(i, row)| row.month().index() != *i)
    {
        return Err(EngineError::invalid(format!(
            "row {} holds {}, expected months in calendar order",
            i + 1,
            row.month()
        )));
    }

    let total_amount = rows
        .iter()
        .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(row.amount()))
        .ok_or_else(|| EngineError::invalid("yearly total is too large to represent"))?;
    let total_delivered: u32 = rows.iter().map(MonthRow::delivered).sum();
    let total_not_delivered: u32 = rows.iter().map(MonthRow::not_delivered).sum();

    let average_price = if total_delivered == 0 {
        rows[0].price_per_kg()
    } else {
        total_amount / Decimal::from(total_delivered)
    };

    Ok(Summary {
        total_amount,
        total_delivered,
        total_not_delivered,
        average_price,
        average_monthly_amount: total_amount / Decimal::from(rows.len()),
    })
}
