use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub(crate) const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Price used for a fresh table and after a reset.
    pub(crate) default_price_per_kg: Decimal,
    pub(crate) min_year: i32,
    pub(crate) max_year: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_price_per_kg: Decimal::from(55),
            min_year: 2020,
            max_year: 2030,
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.min_year <= 0 {
            anyhow::bail!("min_year must be positive, got {}", self.min_year);
        }
        if self.min_year > self.max_year {
            anyhow::bail!(
                "min_year ({}) is after max_year ({})",
                self.min_year,
                self.max_year
            );
        }
        if self.default_price_per_kg < Decimal::ZERO {
            anyhow::bail!(
                "default_price_per_kg must not be negative, got {}",
                self.default_price_per_kg
            );
        }
        // A leap year's worth of deliveries must stay representable.
        if Decimal::from(366)
            .checked_mul(self.default_price_per_kg)
            .is_none()
        {
            anyhow::bail!(
                "default_price_per_kg is too large, got {}",
                self.default_price_per_kg
            );
        }
        Ok(())
    }

    pub(crate) fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    pub(crate) fn clamp_year(&self, year: i32) -> i32 {
        year.clamp(self.min_year, self.max_year)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
