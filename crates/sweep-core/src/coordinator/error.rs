//! Setup-phase failures. Any of these aborts the run before a worker starts.

use std::path::PathBuf;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("open log {}: {source}", .path.display())]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("open retry file {}: {source}", .path.display())]
    OpenReplay {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("spawn worker threads: {0}")]
    SpawnWorkers(#[source] std::io::Error),
}
