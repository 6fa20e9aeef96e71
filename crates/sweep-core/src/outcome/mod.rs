//! Outcome classification and the three per-run logs.
//!
//! Success writes the target to `done.log`. Failure writes
//! `<detail> (target: <url>)` to `error.log` and the bare url to `retry.log`,
//! which is directly usable as the next run's replay input.

mod log;

pub use log::LineLog;

use std::io;
use std::path::Path;

use crate::coordinator::SetupError;
use crate::fetch::FetchError;

pub const DONE_LOG: &str = "done.log";
pub const ERROR_LOG: &str = "error.log";
pub const RETRY_LOG: &str = "retry.log";

/// Classification of one processed target.
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(FetchError),
    /// The fetch panicked; the payload message, if any.
    Panicked(String),
}

impl From<Result<u64, FetchError>> for Outcome {
    fn from(res: Result<u64, FetchError>) -> Self {
        match res {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Failure(e),
        }
    }
}

/// Line written to `error.log` for a failed target.
pub fn error_line(detail: &dyn std::fmt::Display, target: &str) -> String {
    format!("{} (target: {})", detail, target)
}

/// The done/error/retry logs of one run.
#[derive(Debug)]
pub struct OutcomeLogs {
    done: LineLog,
    error: LineLog,
    retry: LineLog,
}

impl OutcomeLogs {
    /// Creates all three logs inside `run_dir`. Fails on the first one that cannot be opened.
    pub fn open_in(run_dir: &Path) -> Result<Self, SetupError> {
        let open = |name: &str| {
            let path = run_dir.join(name);
            LineLog::create(&path).map_err(|source| SetupError::OpenLog { path, source })
        };
        Ok(Self {
            done: open(DONE_LOG)?,
            error: open(ERROR_LOG)?,
            retry: open(RETRY_LOG)?,
        })
    }

    /// Writes the log lines for `outcome`.
    pub fn record(&self, target: &str, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Success => self.done.append(target),
            Outcome::Failure(e) => {
                let error_res = self.error.append(&error_line(e, target));
                // Retry line goes out even if the error line failed; it is what replay needs.
                let retry_res = self.retry.append(target);
                error_res.and(retry_res)
            }
            Outcome::Panicked(msg) => {
                let detail = format!("fetch panicked: {}", msg);
                let error_res = self.error.append(&error_line(&detail, target));
                let retry_res = self.retry.append(target);
                error_res.and(retry_res)
            }
        }
    }

    pub fn done(&self) -> &LineLog {
        &self.done
    }

    pub fn error(&self) -> &LineLog {
        &self.error
    }

    pub fn retry(&self) -> &LineLog {
        &self.retry
    }

    /// Flushes all three files to disk.
    pub fn sync_all(&self) -> io::Result<()> {
        self.done.sync()?;
        self.error.sync()?;
        self.retry.sync()
    }
}
