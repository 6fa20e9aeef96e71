//! Per-run summary directory naming.

use chrono::NaiveDateTime;

/// `summary_YYYYMMDD_HHMM` for the given local start time.
pub fn run_dir_name(started: NaiveDateTime) -> String {
    format!("summary_{}", started.format("%Y%m%d_%H%M"))
}
