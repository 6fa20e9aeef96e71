//! Run coordinator: setup, feed, drain.
//!
//! Setup creates the run directory and the artifact directory, opens the three
//! outcome logs and the target source, and starts the pool. Any failure there
//! is returned as `SetupError` before a single target is handed out. After
//! setup the coordinator is the sole producer on the handoff channel; per-target
//! failures never come back here.

mod error;
mod run_dir;

pub use error::SetupError;
pub use run_dir::run_dir_name;

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{ConfigError, SweepConfig};
use crate::fetch::{ArtifactStore, FetchOptions, FetchPersist, Fetcher};
use crate::identity::{IdentitySupplier, UserAgentPool};
use crate::outcome::OutcomeLogs;
use crate::pool::{Jitter, WorkerPool};
use crate::target::TargetSource;

/// Everything one run needs.
#[derive(Clone)]
pub struct RunOptions {
    /// Base directory for the run directory and a relative artifact directory.
    pub output_root: PathBuf,
    pub artifact_dir: PathBuf,
    pub source: TargetSource,
    pub thread_count: usize,
    pub jitter: Jitter,
    pub fetch: FetchOptions,
    pub identity: Arc<dyn IdentitySupplier>,
}

impl RunOptions {
    pub fn from_config(cfg: &SweepConfig, source: TargetSource, output_root: PathBuf) -> Self {
        Self {
            output_root,
            artifact_dir: cfg.artifact_dir.clone(),
            source,
            thread_count: cfg.thread_count,
            jitter: Jitter::seconds(cfg.jitter_max_secs),
            fetch: FetchOptions::from_config(cfg),
            identity: Arc::new(UserAgentPool::default()),
        }
    }

    fn artifact_path(&self) -> PathBuf {
        self.output_root.join(&self.artifact_dir)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_dir: PathBuf,
    pub artifact_dir: PathBuf,
    pub submitted: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Targets the pool never took because every worker had died.
    pub abandoned: u64,
    pub panicked_workers: usize,
    pub elapsed_secs: f64,
}

fn create_dir(path: &Path) -> Result<(), SetupError> {
    fs::create_dir_all(path).map_err(|source| SetupError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs with the curl fetcher. `started` names the run directory.
pub fn run(opts: &RunOptions, started: NaiveDateTime) -> Result<RunSummary, SetupError> {
    let store = ArtifactStore::new(opts.artifact_path());
    let identity = Arc::clone(&opts.identity);
    let fetch = opts.fetch;
    run_with(opts, started, move |_| {
        Fetcher::new(Arc::clone(&identity), store.clone(), fetch)
    })
}

/// Runs with a caller-supplied fetch operation, one instance per worker.
pub fn run_with<F, M>(
    opts: &RunOptions,
    started: NaiveDateTime,
    make_fetcher: M,
) -> Result<RunSummary, SetupError>
where
    F: FetchPersist,
    M: Fn(usize) -> F + Send + Sync + 'static,
{
    if opts.thread_count == 0 {
        return Err(ConfigError::NoWorkers.into());
    }

    let run_dir = opts.output_root.join(run_dir_name(started));
    create_dir(&run_dir)?;
    let artifact_dir = opts.artifact_path();
    create_dir(&artifact_dir)?;
    let logs = Arc::new(OutcomeLogs::open_in(&run_dir)?);

    let mut targets = opts.source.open()?;

    let (pool, handoff) =
        WorkerPool::start(opts.thread_count, Arc::clone(&logs), opts.jitter, make_fetcher)
            .map_err(SetupError::SpawnWorkers)?;
    tracing::info!(
        run_dir = %run_dir.display(),
        mode = opts.source.mode(),
        workers = opts.thread_count,
        "run started"
    );

    let t0 = Instant::now();
    let mut submitted = 0u64;
    let mut abandoned = 0u64;
    while let Some(target) = targets.next() {
        if let Err(gone) = handoff.submit(target) {
            abandoned = 1 + targets.by_ref().count() as u64;
            tracing::error!(error = %gone, abandoned, "all workers stopped; remaining targets not processed");
            break;
        }
        submitted += 1;
    }
    handoff.close();
    let report = pool.join();

    if let Err(e) = logs.sync_all() {
        tracing::warn!(error = %e, "outcome log sync failed");
    }
    if report.log_errors() > 0 {
        tracing::warn!(count = report.log_errors(), "some outcome lines could not be written");
    }

    let summary = RunSummary {
        run_dir,
        artifact_dir,
        submitted,
        succeeded: report.succeeded(),
        failed: report.failed(),
        abandoned,
        panicked_workers: report.panicked,
        elapsed_secs: t0.elapsed().as_secs_f64(),
    };
    tracing::info!(
        submitted = summary.submitted,
        succeeded = summary.succeeded,
        failed = summary.failed,
        elapsed_secs = summary.elapsed_secs,
        "run finished"
    );
    Ok(summary)
}
