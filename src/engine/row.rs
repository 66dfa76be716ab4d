use rust_decimal::Decimal;
use serde::Serialize;

use super::{EngineError, EngineResult};
use crate::models::Month;

/// Figures derived for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowFigures {
    pub(crate) not_delivered: u32,
    pub(crate) delivered: u32,
    pub(crate) amount: Decimal,
}

/// Derive delivered days and amount for one month.
///
/// `not_delivered` is clamped into `[0, days_in_month]`; an edit can never
/// leave a row with negative deliveries. A negative price or an impossible
/// month length is rejected.
pub(crate) fn compute_row(
    days_in_month: u32,
    price_per_kg: Decimal,
    not_delivered: i64,
) -> EngineResult<RowFigures> {
    if !(28..=31).contains(&days_in_month) {
        return Err(EngineError::invalid(format!(
            "a month has 28 to 31 days, got {days_in_month}"
        )));
    }
    if price_per_kg < Decimal::ZERO {
        return Err(EngineError::invalid(format!(
            "price per kg must not be negative, got {price_per_kg}"
        )));
    }

    let not_delivered = u32::try_from(not_delivered.max(0))
        .unwrap_or(u32::MAX)
        .min(days_in_month);
    let delivered = days_in_month - not_delivered;
    let amount = Decimal::from(delivered)
        .checked_mul(price_per_kg)
        .ok_or_else(|| EngineError::invalid(format!("price per kg {price_per_kg} is too large")))?;
    Ok(RowFigures {
        not_delivered,
        delivered,
        amount,
    })
}

/// Strict counterpart of the clamp in [`compute_row`], for values that were
/// stored rather than typed.
pub(crate) fn check_not_delivered(month: Month, days_in_month: u32, value: i64) -> EngineResult<u32> {
    match u32::try_from(value) {
        Ok(v) if v <= days_in_month => Ok(v),
        _ => Err(EngineError::OutOfRangeInput {
            month: month.to_string(),
            value,
            days: days_in_month,
        }),
    }
}

/// One computed month of a table. Only the engine constructs these, so the
/// `delivered + not_delivered == days_in_month` invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonthRow {
    #[serde(skip)]
    month: Month,
    #[serde(rename = "month")]
    label: String,
    days_in_month: u32,
    price_per_kg: Decimal,
    not_delivered: u32,
    delivered: u32,
    amount: Decimal,
}

impl MonthRow {
    pub(crate) fn compute(
        year: i32,
        month: Month,
        days_in_month: u32,
        price_per_kg: Decimal,
        not_delivered: i64,
    ) -> EngineResult<Self> {
        let figures = compute_row(days_in_month, price_per_kg, not_delivered)?;
        Ok(Self {
            month,
            label: month.label(year),
            days_in_month,
            price_per_kg,
            not_delivered: figures.not_delivered,
            delivered: figures.delivered,
            amount: figures.amount,
        })
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub(crate) fn price_per_kg(&self) -> Decimal {
        self.price_per_kg
    }

    pub(crate) fn not_delivered(&self) -> u32 {
        self.not_delivered
    }

    pub(crate) fn delivered(&self) -> u32 {
        self.delivered
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }
}
