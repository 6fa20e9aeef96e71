//! Tracing setup for the `sweep` binary.
//!
//! Events go to `$XDG_STATE_HOME/sweep/sweep.log`, or to stderr when that file
//! cannot be opened. Thread names are kept on every line, so events from the
//! pool carry their `sweep-worker-N` name. `RUST_LOG` replaces the default filter.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Per-target chatter from the core and the `sweep` binary at debug, everything else at info.
const DEFAULT_FILTER: &str = "info,sweep=debug,sweep_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Fails if one is already set.
fn install(writer: BoxMakeWriter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))
}

/// Path of the log file: `$XDG_STATE_HOME/sweep/sweep.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sweep")?;
    Ok(xdg_dirs.get_state_home().join("sweep.log"))
}

/// Logs to the state-dir file, appending across runs. Returns the file path.
/// On error nothing is installed and the caller can fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    // `&File` is `Write`, so every event writes straight to the shared handle.
    install(BoxMakeWriter::new(Arc::new(file)))?;
    tracing::info!("sweep logging to {}", path.display());
    Ok(path)
}

/// Logs to stderr only.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(std::io::stderr));
}
