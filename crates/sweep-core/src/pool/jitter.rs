//! Randomized per-worker pause between targets.

use rand::Rng;
use std::time::Duration;

/// Uniform pause of `k * unit` with `k` drawn from `[0, max_units)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    max_units: u64,
    unit: Duration,
}

impl Jitter {
    pub fn new(max_units: u64, unit: Duration) -> Self {
        Self { max_units, unit }
    }

    /// Whole seconds in `[0, max_secs)`.
    pub fn seconds(max_secs: u64) -> Self {
        Self::new(max_secs, Duration::from_secs(1))
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_units == 0 || self.unit.is_zero() {
            return Duration::ZERO;
        }
        let k = rng.gen_range(0..self.max_units);
        self.unit.saturating_mul(u32::try_from(k).unwrap_or(u32::MAX))
    }

    /// Sleeps the calling worker thread only; other workers keep running.
    pub fn pause(&self) -> Duration {
        let d = self.sample(&mut rand::thread_rng());
        if !d.is_zero() {
            std::thread::sleep(d);
        }
        d
    }
}
