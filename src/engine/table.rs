use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{aggregate, month_lengths, EngineError, EngineResult, MonthRow, Summary};
use crate::models::Month;

/// What the interface hands the engine on every interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeliveryInput {
    pub(crate) year: i32,
    pub(crate) price_per_kg: Decimal,
    /// Month index (0 = January) to days not delivered. Missing months are 0.
    pub(crate) overrides: BTreeMap<usize, i64>,
}

impl DeliveryInput {
    pub(crate) fn new(year: i32, price_per_kg: Decimal) -> Self {
        Self {
            year,
            price_per_kg,
            overrides: BTreeMap::new(),
        }
    }

    pub(crate) fn with_not_delivered(mut self, values: &[u32; 12]) -> Self {
        for (i, &v) in values.iter().enumerate() {
            if v != 0 {
                self.overrides.insert(i, i64::from(v));
            }
        }
        self
    }
}

/// Twelve computed rows for one year, January first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonthTable {
    year: i32,
    price_per_kg: Decimal,
    rows: Vec<MonthRow>,
}

impl MonthTable {
    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn price_per_kg(&self) -> Decimal {
        self.price_per_kg
    }

    pub(crate) fn rows(&self) -> &[MonthRow] {
        &self.rows
    }

    pub(crate) fn row(&self, month: Month) -> &MonthRow {
        &self.rows[month.index()]
    }

    pub(crate) fn not_delivered(&self) -> [u32; 12] {
        let mut values = [0; 12];
        for (slot, row) in values.iter_mut().zip(&self.rows) {
            *slot = row.not_delivered();
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Calculation {
    #[serde(flatten)]
    pub(crate) table: MonthTable,
    pub(crate) summary: Summary,
}

/// Build the full table and its summary from scratch.
pub(crate) fn compute(input: &DeliveryInput) -> EngineResult<Calculation> {
    if let Some(bad) = input.overrides.keys().find(|&&i| i >= 12) {
        return Err(EngineError::invalid(format!(
            "month index must be 0 to 11, got {bad}"
        )));
    }

    let lengths = month_lengths(input.year)?;
    let rows = Month::all()
        .iter()
        .zip(lengths)
        .map(|(&month, days)| {
            let not_delivered = input.overrides.get(&month.index()).copied().unwrap_or(0);
            MonthRow::compute(input.year, month, days, input.price_per_kg, not_delivered)
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let summary = aggregate(&rows)?;
    Ok(Calculation {
        table: MonthTable {
            year: input.year,
            price_per_kg: input.price_per_kg,
            rows,
        },
        summary,
    })
}
