//! Local artifact naming and creation.
//!
//! The artifact name is whatever follows the final `/` of the target. Two
//! targets sharing that segment write the same file; the later one wins.

use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Substring after the final `/` (the whole target when there is none).
pub fn artifact_name(target: &str) -> &str {
    target.rsplit('/').next().unwrap_or(target)
}

/// Directory holding one file per successful target.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, target: &str) -> PathBuf {
        self.dir.join(artifact_name(target))
    }

    /// Creates or truncates the artifact for `target`.
    pub fn create(&self, target: &str) -> io::Result<File> {
        let name = artifact_name(target);
        if name.is_empty() || name == "." || name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target has no usable final path segment",
            ));
        }
        File::create(self.dir.join(name))
    }
}
