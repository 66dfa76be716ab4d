use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_FILE: &str = "milkpay.log";
const LOG_ENV: &str = "MILKPAY_LOG";

static TRACING_INIT: Once = Once::new();

/// Route `tracing` events to an append-only file. The terminal belongs to the
/// UI, so nothing is ever written to stdout or stderr from here.
pub(crate) fn init_tracing(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("milkpay=info"));

    TRACING_INIT.call_once(|| {
        // A subscriber installed by someone else wins; logging is best-effort.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    });
    Ok(())
}
