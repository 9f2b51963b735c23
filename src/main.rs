mod aggregate;
mod config;
mod db;
mod models;
mod run;
mod store;
mod ui;
mod view;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DB_FILE: &str = "monthspend.db";
const LOG_FILE: &str = "monthspend.log";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let proj_dirs = directories::ProjectDirs::from("com", "monthspend", "MonthSpend")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let config = config::Config::load(&proj_dirs.config_dir().join(config::CONFIG_FILE))?;
    let data_dir =
        config.resolve_data_dir(std::env::var_os(config::DATA_DIR_ENV), proj_dirs.data_dir());
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    init_logging(&data_dir)?;

    let db = db::Database::open(&data_dir.join(DB_FILE))?;
    let mut store = store::ExpenseStore::new(db);

    match args.len() {
        0 | 1 => run::as_tui(&mut store, &config),
        _ => run::as_cli(&args, &mut store, &config),
    }
}

/// Logs go to a file: the TUI owns the terminal.
/// Priority: RUST_LOG env var > default (info)
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .compact(),
        )
        .init();
    Ok(())
}
