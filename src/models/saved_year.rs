use rust_decimal::Decimal;

use crate::engine::{self, DeliveryInput, EngineResult, MonthTable};

use super::Month;

/// The persisted form of one year's table: the inputs, never the derived figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SavedYear {
    pub(crate) year: i32,
    pub(crate) price_per_kg: Decimal,
    /// Raw stored values, indexed January..December.
    pub(crate) not_delivered: [i64; 12],
    pub(crate) saved_at: String,
}

impl SavedYear {
    pub(crate) fn from_table(table: &MonthTable) -> Self {
        Self {
            year: table.year(),
            price_per_kg: table.price_per_kg(),
            not_delivered: table.not_delivered().map(i64::from),
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Checks every stored value against the year's calendar. Stored data is
    /// rejected rather than clamped.
    pub(crate) fn to_input(&self) -> EngineResult<DeliveryInput> {
        let lengths = engine::month_lengths(self.year)?;
        let mut input = DeliveryInput::new(self.year, self.price_per_kg);
        for (month, (&days, &value)) in Month::all()
            .iter()
            .zip(lengths.iter().zip(self.not_delivered.iter()))
        {
            let checked = engine::check_not_delivered(*month, days, value)?;
            input.overrides.insert(month.index(), i64::from(checked));
        }
        Ok(input)
    }
}
