mod aggregate;
mod calendar;
mod error;
mod row;
mod table;

pub(crate) use aggregate::{aggregate, Summary};
pub(crate) use calendar::{days_in_year, is_leap_year, month_lengths};
pub(crate) use error::{EngineError, EngineResult};
pub(crate) use row::{check_not_delivered, MonthRow};
pub(crate) use table::{compute, Calculation, DeliveryInput, MonthTable};

#[cfg(test)]
mod tests;
