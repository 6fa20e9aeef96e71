//! Worker loop: receive, fetch, classify, pause.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, PoisonError};

use crate::fetch::FetchPersist;
use crate::outcome::{Outcome, OutcomeLogs};

use super::jitter::Jitter;

/// Per-worker state. `Stopped` is only entered from `Idle`, so a worker always
/// finishes classifying and pausing before it looks at the channel again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Fetching,
    Classifying,
    Sleeping,
    Stopped,
}

/// What one worker did before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub succeeded: u64,
    pub failed: u64,
    /// Outcome lines that could not be written.
    pub log_errors: u64,
}

impl WorkerReport {
    pub fn processed(&self) -> u64 {
        self.succeeded + self.failed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

pub(super) struct Worker<'a, F> {
    pub(super) id: usize,
    pub(super) handoff: &'a Mutex<Receiver<String>>,
    pub(super) fetcher: F,
    pub(super) logs: &'a OutcomeLogs,
    pub(super) jitter: Jitter,
}

impl<F: FetchPersist> Worker<'_, F> {
    fn transition(&self, state: &mut WorkerState, next: WorkerState) {
        tracing::trace!(worker = self.id, from = ?*state, to = ?next, "worker state");
        *state = next;
    }

    /// Blocks for the next target. `None` once the channel is closed and drained.
    fn next_target(&self) -> Option<String> {
        // Holding the lock across `recv` means one idle worker waits on the
        // channel while the others wait on the lock; each target still goes to
        // exactly one worker.
        let rx = self.handoff.lock().unwrap_or_else(PoisonError::into_inner);
        rx.recv().ok()
    }

    pub(super) fn run(mut self) -> WorkerReport {
        let mut report = WorkerReport {
            worker: self.id,
            ..WorkerReport::default()
        };
        let mut state = WorkerState::Idle;

        while let Some(target) = self.next_target() {
            self.transition(&mut state, WorkerState::Fetching);
            // A panicking fetch still classifies its target; the worker keeps going.
            let fetched =
                panic::catch_unwind(AssertUnwindSafe(|| self.fetcher.fetch_and_store(&target)));
            let outcome = match fetched {
                Ok(res) => Outcome::from(res),
                Err(payload) => Outcome::Panicked(panic_message(payload.as_ref())),
            };

            self.transition(&mut state, WorkerState::Classifying);
            match &outcome {
                Outcome::Success => {
                    report.succeeded += 1;
                    tracing::debug!(worker = self.id, target_url = %target, "done");
                }
                Outcome::Failure(e) => {
                    report.failed += 1;
                    tracing::debug!(worker = self.id, target_url = %target, kind = e.kind(), error = %e, "failed");
                }
                Outcome::Panicked(msg) => {
                    report.failed += 1;
                    tracing::error!(worker = self.id, target_url = %target, panic = %msg, "fetch panicked");
                }
            }
            if let Err(e) = self.logs.record(&target, &outcome) {
                report.log_errors += 1;
                tracing::error!(worker = self.id, target_url = %target, error = %e, "outcome log write failed");
            }

            self.transition(&mut state, WorkerState::Sleeping);
            self.jitter.pause();
            self.transition(&mut state, WorkerState::Idle);
        }

        self.transition(&mut state, WorkerState::Stopped);
        tracing::debug!(
            worker = self.id,
            succeeded = report.succeeded,
            failed = report.failed,
            "worker stopped"
        );
        report
    }
}
