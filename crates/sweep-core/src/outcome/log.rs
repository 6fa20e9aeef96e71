//! Append-only, line-oriented log shared by all workers.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// One outcome log file. Whole lines are written under an internal lock with a
/// single unbuffered `write_all`, so concurrent writers never interleave and a
/// recorded line is already in the OS once `append` returns.
#[derive(Debug)]
pub struct LineLog {
    file: Mutex<File>,
    lines: AtomicU64,
}

impl LineLog {
    /// Creates (or truncates) the log at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Mutex::new(file),
            lines: AtomicU64::new(0),
        })
    }

    /// Appends `line` plus a newline.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(&buf)?;
        self.lines.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Lines appended so far by this process.
    pub fn lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn sync(&self) -> io::Result<()> {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sync_all()
    }
}
