//! Fetch-persist: one GET per target, body streamed to the artifact directory.
//!
//! Each worker owns a `Fetcher` whose curl handle is reused across targets so
//! connections to the same host are kept alive between requests.

mod artifact;
mod error;
mod sink;

pub use artifact::{artifact_name, ArtifactStore};
pub use error::FetchError;

use std::cell::RefCell;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SweepConfig;
use crate::identity::IdentitySupplier;
use sink::BodySink;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: u32 = 10;
/// Throughput floor used with `low_speed_time`.
const LOW_SPEED_LIMIT_BYTES: u32 = 1024;

/// Operation a worker runs on every target. Returns the artifact size on success.
pub trait FetchPersist {
    fn fetch_and_store(&mut self, target: &str) -> Result<u64, FetchError>;
}

/// Network limits applied to every request. `None` leaves curl's default (no limit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Option<Duration>,
    pub low_speed_time: Option<Duration>,
}

impl FetchOptions {
    pub fn from_config(cfg: &SweepConfig) -> Self {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        Self {
            connect_timeout: secs(cfg.connect_timeout_secs),
            low_speed_time: secs(cfg.low_speed_time_secs),
        }
    }
}

/// curl-backed `FetchPersist`.
pub struct Fetcher {
    easy: curl::easy::Easy,
    identity: Arc<dyn IdentitySupplier>,
    store: ArtifactStore,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(
        identity: Arc<dyn IdentitySupplier>,
        store: ArtifactStore,
        options: FetchOptions,
    ) -> Self {
        Self {
            easy: curl::easy::Easy::new(),
            identity,
            store,
            options,
        }
    }

    /// Resets per-request options; the connection cache survives `reset`.
    fn prepare(&mut self, target: &str) -> Result<(), curl::Error> {
        let easy = &mut self.easy;
        easy.reset();
        easy.url(target)?;
        easy.get(true)?;
        easy.useragent(self.identity.identity())?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t)?;
        }
        if let Some(t) = self.options.low_speed_time {
            easy.low_speed_limit(LOW_SPEED_LIMIT_BYTES)?;
            easy.low_speed_time(t)?;
        }
        Ok(())
    }
}

impl FetchPersist for Fetcher {
    fn fetch_and_store(&mut self, target: &str) -> Result<u64, FetchError> {
        self.prepare(target).map_err(FetchError::Transport)?;

        let path = self.store.path_for(target);
        let sink = RefCell::new(BodySink::new(&self.store, target));
        let performed = {
            let mut transfer = self.easy.transfer();
            transfer
                .header_function(|line| sink.borrow_mut().on_header(line))
                .map_err(FetchError::Transport)?;
            transfer
                .write_function(|data| Ok(sink.borrow_mut().on_body(data)))
                .map_err(FetchError::Transport)?;
            transfer.perform()
        };
        let sink = sink.into_inner();
        let status = sink.status();

        if let Err(e) = performed {
            if let Some(source) = sink.error {
                return Err(FetchError::Persist { path, source });
            }
            if status == Some(200) {
                // The 200 arrived; copying its body, not the request, failed.
                // The artifact normally exists already; make sure it does.
                if sink.file.is_none() {
                    self.store
                        .create(target)
                        .map_err(|source| FetchError::Persist {
                            path: path.clone(),
                            source,
                        })?;
                }
                return Err(FetchError::Persist {
                    path,
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("body transfer interrupted: {}", e),
                    ),
                });
            }
            return Err(FetchError::Transport(e));
        }

        let code = self.easy.response_code().map_err(FetchError::Transport)?;
        if code != 200 {
            return Err(FetchError::UnexpectedStatus(code));
        }

        if sink.file.is_none() {
            // No header end seen (HTTP/0.9 style reply) and no body.
            self.store
                .create(target)
                .map_err(|source| FetchError::Persist {
                    path: path.clone(),
                    source,
                })?;
        }
        tracing::trace!(target_url = target, bytes = sink.written, "artifact stored");
        Ok(sink.written)
    }
}
