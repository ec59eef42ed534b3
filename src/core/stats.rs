use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub retries: usize,
    pub bytes: u64,
    pub in_flight: usize,
}

/// Counters shared by every fetch task of one dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    inner: Arc<Mutex<StatsSnapshot>>,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    // A task that panicked while holding the guard leaves plain integers
    // behind, so the poisoned value is still usable.
    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks a fetch as in flight until the returned guard is dropped.
    pub fn begin(&self) -> InFlight {
        let mut stats = self.lock();
        stats.started += 1;
        stats.in_flight += 1;
        InFlight {
            stats: self.clone(),
        }
    }

    pub fn record_retry(&self) {
        self.lock().retries += 1;
    }

    pub fn record_success(&self, bytes: u64) {
        let mut stats = self.lock();
        stats.succeeded += 1;
        stats.bytes += bytes;
    }

    pub fn record_failure(&self) {
        self.lock().failed += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.lock()
    }
}

pub struct InFlight {
    stats: DispatchStats,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut stats = self.stats.lock();
        stats.in_flight = stats.in_flight.saturating_sub(1);
    }
}
