mod csv_export;
mod json_export;

pub(crate) use csv_export::write_csv;
pub(crate) use json_export::to_json;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::Calculation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from a file extension (`.csv` / `.json`).
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub(crate) fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

pub(crate) fn default_export_path(dir: &Path, year: i32, format: ExportFormat) -> PathBuf {
    dir.join(format!("milk_delivery_{year}.{}", format.extension()))
}

/// Write `calc` to `path` in the format implied by its extension. The file is
/// written beside the target and renamed into place, so an existing export
/// is never left half-written.
pub(crate) fn export_to_path(calc: &Calculation, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported export file: {} (use .csv or .json)",
            path.display()
        )
    })?;

    let mut buf: Vec<u8> = Vec::new();
    match format {
        ExportFormat::Csv => {
            write_csv(calc, &mut buf)?;
        }
        ExportFormat::Json => buf.extend_from_slice(to_json(calc)?.as_bytes()),
    }

    let tmp = tmp_path(path);
    let written = fs::write(&tmp, &buf)
        .with_context(|| format!("Failed to write export: {}", tmp.display()))
        .and_then(|()| {
            fs::rename(&tmp, path)
                .with_context(|| format!("Failed to write export: {}", path.display()))
        });
    if let Err(e) = written {
        // A failed export leaves no temp file behind.
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    tracing::info!(path = %path.display(), %format, year = calc.table.year(), "exported table");
    Ok(format)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
