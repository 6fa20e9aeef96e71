//! Per-target fetch failure.

use std::path::PathBuf;

/// Why a single target failed. Every variant is recorded and left for replay;
/// none of them stops the worker.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request never produced a usable response (DNS, connect, TLS, bad URL, ...).
    #[error("transport: {0}")]
    Transport(#[source] curl::Error),
    /// Terminal status other than 200. 3xx, 4xx and 5xx are not distinguished.
    #[error("not status 200: got {0}")]
    UnexpectedStatus(u32),
    /// Artifact could not be created or the body copy stopped partway.
    /// A partial file may remain at `path`.
    #[error("persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Stable short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::UnexpectedStatus(_) => "status",
            FetchError::Persist { .. } => "persist",
        }
    }
}
