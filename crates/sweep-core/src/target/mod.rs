//! Target sources: the lazy, finite sequence of URLs a run works through.
//!
//! Range mode expands `[min, max]` through a URL template in ascending order;
//! replay mode re-reads a previous run's `retry.log` line by line. A source is
//! consumed once by the coordinator and cannot be restarted mid-sequence.

mod range;
mod replay;
mod template;

pub use range::RangeTargets;
pub use replay::ReplayTargets;
pub use template::UrlTemplate;

use std::path::PathBuf;

use crate::coordinator::SetupError;

/// Which source a run draws its targets from. Mutually exclusive per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Every integer of `[min, max]` substituted into `template`.
    Range {
        template: UrlTemplate,
        min: u64,
        max: u64,
    },
    /// Non-empty lines of a previously written retry log, in file order.
    Replay { path: PathBuf },
}

impl TargetSource {
    /// Opens the source. Only replay mode can fail here (file cannot be opened).
    pub fn open(&self) -> Result<Targets, SetupError> {
        match self {
            TargetSource::Range { template, min, max } => Ok(Targets::Range(RangeTargets::new(
                template.clone(),
                *min,
                *max,
            ))),
            TargetSource::Replay { path } => ReplayTargets::open(path)
                .map(Targets::Replay)
                .map_err(|source| SetupError::OpenReplay {
                    path: path.clone(),
                    source,
                }),
        }
    }

    /// Short label for logs and summaries.
    pub fn mode(&self) -> &'static str {
        match self {
            TargetSource::Range { .. } => "range",
            TargetSource::Replay { .. } => "replay",
        }
    }
}

/// An opened source, iterated by the coordinator.
pub enum Targets {
    Range(RangeTargets),
    Replay(ReplayTargets),
}

impl Iterator for Targets {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Targets::Range(r) => r.next(),
            Targets::Replay(r) => r.next(),
        }
    }
}
