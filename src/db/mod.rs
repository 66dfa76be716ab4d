mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::SavedYear;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Saved years ───────────────────────────────────────────

    /// Replace the stored record for `saved.year`. Runs in one transaction, so
    /// a failed save leaves the previous record untouched.
    pub(crate) fn save_year(&mut self, saved: &SavedYear) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO delivery_years (year, price_per_kg, saved_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(year) DO UPDATE SET price_per_kg = ?2, saved_at = ?3",
            params![saved.year, saved.price_per_kg.to_string(), saved.saved_at],
        )?;
        tx.execute(
            "DELETE FROM delivery_months WHERE year = ?1",
            params![saved.year],
        )?;
        for (month_index, not_delivered) in saved.not_delivered.iter().enumerate() {
            tx.execute(
                "INSERT INTO delivery_months (year, month_index, not_delivered)
                 VALUES (?1, ?2, ?3)",
                params![saved.year, month_index as i64, not_delivered],
            )?;
        }
        tx.commit()
            .with_context(|| format!("Failed to save {}", saved.year))?;
        tracing::info!(year = saved.year, "saved delivery table");
        Ok(())
    }

    /// Load the record for `year`, or `None` when nothing was saved. A
    /// partial or unreadable record is an error, never a best-effort result.
    pub(crate) fn load_year(&self, year: i32) -> Result<Option<SavedYear>> {
        let header = self.conn.query_row(
            "SELECT price_per_kg, saved_at FROM delivery_years WHERE year = ?1",
            params![year],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );
        let (price_str, saved_at) = match header {
            Ok(h) => h,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let price_per_kg = Decimal::from_str(&price_str)
            .with_context(|| format!("Stored price for {year} is not a number: {price_str}"))?;

        let mut stmt = self.conn.prepare(
            "SELECT month_index, not_delivered FROM delivery_months
             WHERE year = ?1 ORDER BY month_index",
        )?;
        let months = stmt
            .query_map(params![year], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if months.len() != 12 {
            anyhow::bail!(
                "Stored table for {year} has {} months, expected 12",
                months.len()
            );
        }
        let mut not_delivered = [0i64; 12];
        for (slot, (i, (month_index, value))) in
            not_delivered.iter_mut().zip(months.into_iter().enumerate())
        {
            if month_index != i as i64 {
                anyhow::bail!("Stored table for {year} is missing month {}", i + 1);
            }
            *slot = value;
        }

        Ok(Some(SavedYear {
            year,
            price_per_kg,
            not_delivered,
            saved_at,
        }))
    }

    pub(crate) fn saved_years(&self) -> Result<Vec<i32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT year FROM delivery_years ORDER BY year")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Returns whether a record existed.
    pub(crate) fn delete_year(&self, year: i32) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM delivery_years WHERE year = ?1", params![year])?;
        if removed > 0 {
            tracing::info!(year, "deleted saved delivery table");
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests;
