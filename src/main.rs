mod config;
mod db;
mod engine;
mod export;
mod logging;
mod models;
mod run;
mod session;
mod ui;

use anyhow::{Context, Result};
use chrono::Datelike;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::session::Session;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dirs = project_dirs()?;

    let data_dir = ensure_dir(dirs.data_dir())?;
    logging::init_tracing(&data_dir.join(logging::LOG_FILE))?;

    let config_dir = ensure_dir(dirs.config_dir())?;
    let config = Config::load(&config_dir.join(config::CONFIG_FILE))?;

    let mut db = db::Database::open(&data_dir.join("milkpay.db"))?;
    let year = config.clamp_year(chrono::Local::now().year());
    tracing::info!(year, version = env!("CARGO_PKG_VERSION"), "starting");

    match args.len() {
        1 => {
            let (session, source, load_error) = Session::open_or_fresh(config, year, &db)?;
            let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            run::as_tui(session, source, load_error, export_dir, &mut db)
        }
        2.. => run::as_cli(&args, &config, year, &mut db),
        _ => {
            eprintln!("Usage: milkpay [command]");
            Ok(())
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "milkpay", "milkpay")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}
