use std::time::Duration;

use super::stats::StatsSnapshot;
use super::target::Target;
use crate::config::ResultOrder;
use crate::errors::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success {
        target: Target,
        elapsed: Duration,
        bytes: u64,
    },
    Failure {
        target: Target,
        elapsed: Duration,
        error: FetchError,
    },
}

impl FetchResult {
    pub fn success(target: Target, elapsed: Duration, bytes: u64) -> Self {
        FetchResult::Success {
            target,
            elapsed,
            bytes,
        }
    }

    pub fn failure(target: Target, elapsed: Duration, error: FetchError) -> Self {
        FetchResult::Failure {
            target,
            elapsed,
            error,
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            FetchResult::Success { target, .. } | FetchResult::Failure { target, .. } => target,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            FetchResult::Success { elapsed, .. } | FetchResult::Failure { elapsed, .. } => *elapsed,
        }
    }

    pub fn bytes(&self) -> Option<u64> {
        match self {
            FetchResult::Success { bytes, .. } => Some(*bytes),
            FetchResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/// Everything one dispatch call produced: one result per target plus the
/// wall-clock time from dispatch start to the last collected result.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    results: Vec<FetchResult>,
    elapsed: Duration,
    stats: StatsSnapshot,
    order: ResultOrder,
}

impl DispatchReport {
    pub fn new(
        results: Vec<FetchResult>,
        elapsed: Duration,
        stats: StatsSnapshot,
        order: ResultOrder,
    ) -> Self {
        Self {
            results,
            elapsed,
            stats,
            order,
        }
    }

    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    pub fn order(&self) -> ResultOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(FetchResult::is_failure)
    }

    pub fn total_bytes(&self) -> u64 {
        self.results.iter().filter_map(FetchResult::bytes).sum()
    }
}
