//! Replay of a previous run's retry log.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Yields every non-empty line of the file, in order. Lines are not validated;
/// a malformed entry fails later at fetch time like any other bad target.
pub struct ReplayTargets {
    lines: Option<Lines<Box<dyn BufRead + Send>>>,
    path: PathBuf,
}

impl ReplayTargets {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }

    fn from_reader<R: BufRead + Send + 'static>(reader: R, path: &Path) -> Self {
        let reader: Box<dyn BufRead + Send> = Box::new(reader);
        Self {
            lines: Some(reader.lines()),
            path: path.to_path_buf(),
        }
    }
}

impl Iterator for ReplayTargets {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let lines = self.lines.as_mut()?;
            match lines.next() {
                Some(Ok(line)) => {
                    let line = line.strip_suffix('\r').unwrap_or(&line);
                    if line.is_empty() {
                        continue;
                    }
                    return Some(line.to_string());
                }
                Some(Err(e)) => {
                    // A read error ends the source; whatever was read so far still runs.
                    tracing::warn!(path = %self.path.display(), error = %e, "replay file read failed, treating as exhausted");
                    self.lines = None;
                    return None;
                }
                None => {
                    self.lines = None;
                    return None;
                }
            }
        }
    }
}
