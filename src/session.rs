use rust_decimal::Decimal;

use crate::config::Config;
use crate::db::Database;
use crate::engine::{compute, Calculation, DeliveryInput, EngineError, EngineResult, MonthTable, Summary};
use crate::models::{Month, SavedYear};

/// Where the table for a newly selected year came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum YearSource {
    Saved,
    Fresh,
}

/// State owned by one user session: the inputs being edited and the last
/// successful calculation. Every mutation recomputes the whole table and only
/// commits when that succeeds, so a failed edit leaves the previous table.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    config: Config,
    year: i32,
    price_per_kg: Decimal,
    not_delivered: [u32; 12],
    calculation: Calculation,
    dirty: bool,
}

impl Session {
    /// A fresh table for `year` with the configured default price.
    pub(crate) fn new(config: Config, year: i32) -> EngineResult<Self> {
        check_year(&config, year)?;
        let price = config.default_price_per_kg;
        let calculation = compute(&DeliveryInput::new(year, price))?;
        Ok(Self {
            config,
            year,
            price_per_kg: price,
            not_delivered: [0; 12],
            calculation,
            dirty: false,
        })
    }

    /// Open `year`, preferring the saved record when one exists.
    pub(crate) fn open(config: Config, year: i32, db: &Database) -> EngineResult<(Self, YearSource)> {
        let mut session = Self::new(config, year)?;
        let source = session.select_year(year, db)?;
        Ok((session, source))
    }

    /// Like [`Session::open`], but a saved record that cannot be loaded gives a
    /// fresh table instead of failing. The load error is returned for display.
    pub(crate) fn open_or_fresh(
        config: Config,
        year: i32,
        db: &Database,
    ) -> EngineResult<(Self, YearSource, Option<EngineError>)> {
        let mut session = Self::new(config, year)?;
        match session.select_year(year, db) {
            Ok(source) => Ok((session, source, None)),
            Err(err) => {
                tracing::warn!(year, error = %err, "saved table unreadable, starting fresh");
                Ok((session, YearSource::Fresh, Some(err)))
            }
        }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn price_per_kg(&self) -> Decimal {
        self.price_per_kg
    }

    pub(crate) fn calculation(&self) -> &Calculation {
        &self.calculation
    }

    pub(crate) fn table(&self) -> &MonthTable {
        &self.calculation.table
    }

    pub(crate) fn summary(&self) -> &Summary {
        &self.calculation.summary
    }

    /// True when the table has edits that were not saved.
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Switch to `year`: reload its saved record, or start a fresh table.
    /// When the store fails the current table stays in place.
    pub(crate) fn select_year(&mut self, year: i32, db: &Database) -> EngineResult<YearSource> {
        check_year(&self.config, year)?;
        let saved = db.load_year(year).map_err(|e| EngineError::persistence(&e))?;
        match saved {
            Some(record) => {
                self.apply_saved(&record)?;
                tracing::info!(year, "loaded saved table");
                Ok(YearSource::Saved)
            }
            None => {
                let price = self.config.default_price_per_kg;
                self.apply(year, price, [0; 12])?;
                self.dirty = false;
                tracing::info!(year, "started fresh table");
                Ok(YearSource::Fresh)
            }
        }
    }

    pub(crate) fn set_price(&mut self, price_per_kg: Decimal) -> EngineResult<()> {
        self.apply(self.year, price_per_kg, self.not_delivered)?;
        tracing::debug!(price = %price_per_kg, "price changed");
        Ok(())
    }

    /// Set a month's not-delivered days. Out-of-range values are clamped;
    /// returns the value that was stored.
    pub(crate) fn set_not_delivered(&mut self, month: Month, value: i64) -> EngineResult<u32> {
        let mut input = DeliveryInput::new(self.year, self.price_per_kg)
            .with_not_delivered(&self.not_delivered);
        input.overrides.insert(month.index(), value);
        let calculation = compute(&input)?;
        let stored = calculation.table.row(month).not_delivered();
        self.commit(calculation);
        tracing::debug!(month = %month, requested = value, stored, "not delivered edited");
        Ok(stored)
    }

    pub(crate) fn adjust_not_delivered(&mut self, month: Month, delta: i64) -> EngineResult<u32> {
        let current = i64::from(self.not_delivered[month.index()]);
        self.set_not_delivered(month, current.saturating_add(delta))
    }

    /// Back to the configured default price with every month fully delivered.
    pub(crate) fn reset(&mut self) -> EngineResult<()> {
        let price = self.config.default_price_per_kg;
        self.apply(self.year, price, [0; 12])?;
        tracing::info!(year = self.year, "table reset");
        Ok(())
    }

    pub(crate) fn save(&mut self, db: &mut Database) -> EngineResult<()> {
        let record = SavedYear::from_table(self.table());
        db.save_year(&record).map_err(|e| {
            tracing::warn!(year = self.year, error = %format!("{e:#}"), "save failed");
            EngineError::persistence(&e)
        })?;
        self.dirty = false;
        Ok(())
    }

    /// Replace the current table with the saved record for this year.
    /// Returns `false` when nothing was saved; the table is left as is.
    pub(crate) fn reload(&mut self, db: &Database) -> EngineResult<bool> {
        let saved = db.load_year(self.year).map_err(|e| {
            tracing::warn!(year = self.year, error = %format!("{e:#}"), "load failed");
            EngineError::persistence(&e)
        })?;
        match saved {
            Some(record) => {
                self.apply_saved(&record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_saved(&mut self, record: &SavedYear) -> EngineResult<()> {
        let calculation = compute(&record.to_input()?)?;
        self.commit(calculation);
        self.dirty = false;
        Ok(())
    }

    fn apply(&mut self, year: i32, price_per_kg: Decimal, not_delivered: [u32; 12]) -> EngineResult<()> {
        let input = DeliveryInput::new(year, price_per_kg).with_not_delivered(&not_delivered);
        let calculation = compute(&input)?;
        self.commit(calculation);
        Ok(())
    }

    fn commit(&mut self, calculation: Calculation) {
        self.dirty = self.dirty
            || calculation.table.year() != self.year
            || calculation.table.price_per_kg() != self.price_per_kg
            || calculation.table.not_delivered() != self.not_delivered;
        self.year = calculation.table.year();
        self.price_per_kg = calculation.table.price_per_kg();
        self.not_delivered = calculation.table.not_delivered();
        self.calculation = calculation;
    }
}

fn check_year(config: &Config, year: i32) -> EngineResult<()> {
    if config.year_in_range(year) {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "year must be between {} and {}, got {year}",
            config.min_year, config.max_year
        )))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
