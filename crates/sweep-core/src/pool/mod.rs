//! Fixed-size worker pool fed through a zero-capacity handoff channel.
//!
//! The coordinator is the only producer. Because the channel has no buffer,
//! `Handoff::submit` returns only once a worker has taken the target, so the
//! producer is never more than one target ahead of the pool. Closing the
//! handoff lets every worker drain out; `WorkerPool::join` waits for all of them.

mod jitter;
mod worker;

pub use jitter::Jitter;
pub use worker::WorkerReport;

use std::io;
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::fetch::FetchPersist;
use crate::outcome::OutcomeLogs;
use worker::Worker;

/// Producer end of the handoff channel.
pub struct Handoff {
    tx: SyncSender<String>,
}

/// Every worker is gone; the target was not taken.
#[derive(Debug, thiserror::Error)]
#[error("no worker left to take target {0}")]
pub struct PoolGone(pub String);

impl Handoff {
    /// Blocks until a worker receives `target`.
    pub fn submit(&self, target: String) -> Result<(), PoolGone> {
        self.tx.send(target).map_err(|mpsc::SendError(t)| PoolGone(t))
    }

    /// Closes the channel. Workers finish their current target and stop.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Totals over all workers after the pool drained.
#[derive(Debug, Clone, Default)]
pub struct PoolReport {
    pub workers: Vec<WorkerReport>,
    /// Workers that panicked; their counts are missing from `workers`.
    pub panicked: usize,
}

impl PoolReport {
    pub fn succeeded(&self) -> u64 {
        self.workers.iter().map(|w| w.succeeded).sum()
    }

    pub fn failed(&self) -> u64 {
        self.workers.iter().map(|w| w.failed).sum()
    }

    pub fn log_errors(&self) -> u64 {
        self.workers.iter().map(|w| w.log_errors).sum()
    }
}

/// Running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerReport>>,
}

impl WorkerPool {
    /// Starts `size` workers. `make_fetcher` is called once per worker, on that
    /// worker's own thread, with the worker index.
    pub fn start<F, M>(
        size: usize,
        logs: Arc<OutcomeLogs>,
        jitter: Jitter,
        make_fetcher: M,
    ) -> io::Result<(Self, Handoff)>
    where
        F: FetchPersist,
        M: Fn(usize) -> F + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<String>(0);
        let rx = Arc::new(Mutex::new(rx));
        let make_fetcher = Arc::new(make_fetcher);
        let mut handles = Vec::with_capacity(size);

        for id in 0..size {
            let rx = Arc::clone(&rx);
            let logs = Arc::clone(&logs);
            let make_fetcher = Arc::clone(&make_fetcher);
            let spawned = thread::Builder::new()
                .name(format!("sweep-worker-{}", id))
                .spawn(move || {
                    Worker {
                        id,
                        handoff: &rx,
                        fetcher: make_fetcher(id),
                        logs: &logs,
                        jitter,
                    }
                    .run()
                });
            match spawned {
                Ok(h) => handles.push(h),
                Err(e) => {
                    // Started workers see the closed channel and exit.
                    drop(tx);
                    for h in handles {
                        let _ = h.join();
                    }
                    return Err(e);
                }
            }
        }
        tracing::debug!(workers = size, "worker pool started");

        Ok((Self { handles }, Handoff { tx }))
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to stop. Call after `Handoff::close`.
    pub fn join(self) -> PoolReport {
        let mut report = PoolReport::default();
        for h in self.handles {
            match h.join() {
                Ok(r) => report.workers.push(r),
                Err(e) => {
                    report.panicked += 1;
                    tracing::error!("worker panicked: {:?}", e);
                }
            }
        }
        report
    }
}
