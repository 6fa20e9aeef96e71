//! Client identity strings for the outbound `User-Agent` header.
//!
//! Purely cosmetic request diversity; nothing here is security relevant.

use rand::seq::SliceRandom;

/// Browser strings the default pool picks from.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:40.0) Gecko/20100101 Firefox/40.1",
    "Mozilla/5.0 (Windows NT 6.3; rv:36.0) Gecko/20100101 Firefox/36.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10; rv:33.0) Gecko/20100101 Firefox/33.0",
    "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2227.1 Safari/537.36",
    "Mozilla/5.0 (compatible, MSIE 11, Windows NT 6.3; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.75.14 (KHTML, like Gecko) Version/7.0.3 Safari/7046A194A",
];

/// Supplies one identity string per fetch attempt.
pub trait IdentitySupplier: Send + Sync {
    fn identity(&self) -> &str;
}

/// Uniform random choice from a fixed, non-empty pool.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Returns `None` for an empty pool.
    pub fn new(agents: Vec<String>) -> Option<Self> {
        if agents.is_empty() {
            None
        } else {
            Some(Self { agents })
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.iter().any(|a| a == agent)
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IdentitySupplier for UserAgentPool {
    fn identity(&self) -> &str {
        // The pool is never empty (checked in `new`, static list in `default`).
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Always returns the same string.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentitySupplier for FixedIdentity {
    fn identity(&self) -> &str {
        &self.0
    }
}
