//! Transfer callbacks: track the status line and stream a 200 body to disk.

use std::fs::File;
use std::io::{self, Write};

use super::artifact::ArtifactStore;

/// Parses `HTTP/x.y NNN reason` (or `HTTP/2 NNN`) into the status code.
pub(super) fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    let mut parts = line.split_whitespace();
    let proto = parts.next()?;
    if !proto.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

fn is_header_end(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// State shared by the header and write callbacks of one transfer.
///
/// The artifact is created as soon as the header block of a 200 response
/// ends, before any body byte, so non-200 responses never touch the artifact
/// directory and an interrupted 200 always leaves a (possibly empty) file.
pub(super) struct BodySink<'a> {
    store: &'a ArtifactStore,
    target: &'a str,
    status: Option<u32>,
    pub(super) file: Option<File>,
    pub(super) written: u64,
    pub(super) error: Option<io::Error>,
}

impl<'a> BodySink<'a> {
    pub(super) fn new(store: &'a ArtifactStore, target: &'a str) -> Self {
        Self {
            store,
            target,
            status: None,
            file: None,
            written: 0,
            error: None,
        }
    }

    /// Status of the last response whose headers were seen.
    pub(super) fn status(&self) -> Option<u32> {
        self.status
    }

    /// Every response (including redirect hops) starts with a status line;
    /// the last one seen belongs to the response whose body follows.
    /// Returns `false` to abort the transfer when the artifact cannot be created.
    pub(super) fn on_header(&mut self, line: &[u8]) -> bool {
        if let Some(code) = parse_status_line(line) {
            self.status = Some(code);
            return true;
        }
        if is_header_end(line) && self.status == Some(200) {
            return self.open_artifact();
        }
        true
    }

    /// Creates the artifact unless it is already open. Records the error on failure.
    pub(super) fn open_artifact(&mut self) -> bool {
        if self.file.is_some() {
            return true;
        }
        match self.store.create(self.target) {
            Ok(f) => {
                self.file = Some(f);
                true
            }
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }

    /// Returns the number of bytes consumed; anything short of `data.len()`
    /// makes curl abort with a write error.
    pub(super) fn on_body(&mut self, data: &[u8]) -> usize {
        if self.status != Some(200) {
            return data.len();
        }
        if !self.open_artifact() {
            return 0;
        }
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        match file.write_all(data) {
            Ok(()) => {
                self.written += data.len() as u64;
                data.len()
            }
            Err(e) => {
                self.error = Some(e);
                0
            }
        }
    }
}
