#[cfg(feature = "board")]
use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

#[cfg(feature = "board")]
use crate::error::MerError;

const LOG_ENV: &str = "MERIDIAN_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logs to stderr, for one-shot commands.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs to a file under the local data dir, for the board (which owns the terminal).
#[cfg(feature = "board")]
pub fn init_file() -> Result<PathBuf, MerError> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meridian");
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("meridian.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(path)
}
