use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info, warn};

use super::cancel::CancelSignal;
use super::result::{DispatchReport, FetchResult};
use super::stats::DispatchStats;
use super::target::Target;
use crate::config::{DispatcherConfig, ResultOrder};
use crate::errors::FetchError;
use crate::feeders::list::ListFeeder;
use crate::feeders::traits::Feeder;
use crate::transport::traits::Transport;

/// Fans one fetch task out per target and collects exactly one result back
/// for each. Holds no state between dispatch calls.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: Arc<DispatcherConfig>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<DispatcherConfig>) -> Self {
        Self { transport, config }
    }

    pub async fn dispatch_targets(
        &self,
        targets: Vec<String>,
        cancel: CancelSignal,
    ) -> DispatchReport {
        self.dispatch(Box::new(ListFeeder::new(targets)), cancel).await
    }

    pub async fn dispatch(&self, feeder: Box<dyn Feeder>, cancel: CancelSignal) -> DispatchReport {
        self.dispatch_with(feeder, cancel, |_| {}).await
    }

    /// Like [`Dispatcher::dispatch`], calling `on_result` once per result in
    /// the configured [`ResultOrder`] as soon as it can be reported.
    pub async fn dispatch_with<F>(
        &self,
        mut feeder: Box<dyn Feeder>,
        cancel: CancelSignal,
        mut on_result: F,
    ) -> DispatchReport
    where
        F: FnMut(&FetchResult),
    {
        let started = Instant::now();
        info!(
            "Dispatching {} targets via {} (concurrency: {})",
            feeder.total_targets(),
            self.transport.id(),
            self.config
                .max_concurrency
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        let semaphore = self
            .config
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n)));
        let stats = DispatchStats::new();
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<Id, Target> = HashMap::new();
        let mut submitted = 0;

        while let Some(url) = feeder.next_target().await {
            let target = Target::new(submitted, url);
            submitted += 1;

            let task = FetchTask {
                transport: self.transport.clone(),
                config: self.config.clone(),
                semaphore: semaphore.clone(),
                stats: stats.clone(),
                cancel: cancel.clone(),
                target: target.clone(),
            };
            let handle = tasks.spawn(task.run());
            pending.insert(handle.id(), target);
        }

        let mut collector = Collector::new(self.config.order);

        while let Some(joined) = tasks.join_next_with_id().await {
            let result = match joined {
                Ok((id, result)) => {
                    pending.remove(&id);
                    result
                }
                Err(e) => {
                    let Some(target) = pending.remove(&e.id()) else {
                        error!("Task {} failed for an unknown target: {}", e.id(), e);
                        continue;
                    };
                    error!("Task for {} failed: {}", target, e);
                    stats.record_failure();
                    FetchResult::failure(target, started.elapsed(), join_failure(e))
                }
            };

            debug!("Collected {}", result.target());
            collector.push(result, &mut on_result);
        }

        let results = collector.finish(&mut on_result);
        let elapsed = started.elapsed();
        let report = DispatchReport::new(results, elapsed, stats.snapshot(), self.config.order);

        info!(
            "Dispatch completed in {:.2}s: {} succeeded, {} failed",
            elapsed.as_secs_f64(),
            report.succeeded(),
            report.failed()
        );
        report
    }
}

struct FetchTask {
    transport: Arc<dyn Transport>,
    config: Arc<DispatcherConfig>,
    semaphore: Option<Arc<Semaphore>>,
    stats: DispatchStats,
    cancel: CancelSignal,
    target: Target,
}

impl FetchTask {
    async fn run(self) -> FetchResult {
        let started = Instant::now();

        if let Err(error) = self.transport.validate(&self.target) {
            warn!("Skipping {}: {}", self.target, error);
            self.stats.record_failure();
            return FetchResult::failure(self.target, started.elapsed(), error);
        }

        let mut cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            outcome = self.fetch_with_limits() => outcome,
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(bytes) => {
                self.stats.record_success(bytes);
                debug!("Fetched {} bytes from {} in {:?}", bytes, self.target, elapsed);
                FetchResult::success(self.target, elapsed, bytes)
            }
            Err(error) => {
                self.stats.record_failure();
                debug!("Fetch of {} failed after {:?}: {}", self.target, elapsed, error);
                FetchResult::failure(self.target, elapsed, error)
            }
        }
    }

    async fn fetch_with_limits(&self) -> Result<u64, FetchError> {
        // Never closed, so acquire cannot fail.
        let _permit = match &self.semaphore {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        };
        let _in_flight = self.stats.begin();

        match self.config.timeout_ms {
            Some(ms) => timeout(Duration::from_millis(ms), self.fetch_with_retries())
                .await
                .map_err(|_| FetchError::Timeout(ms))?,
            None => self.fetch_with_retries().await,
        }
    }

    async fn fetch_with_retries(&self) -> Result<u64, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            match self.transport.fetch(&self.target).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() && attempt < self.config.retries => {
                    attempt += 1;
                    self.stats.record_retry();
                    debug!(
                        "Retrying {} ({}/{}) after: {}",
                        self.target, attempt, self.config.retries, e
                    );
                    sleep(Duration::from_millis(
                        self.config.retry_delay_ms * u64::from(attempt),
                    ))
                    .await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Releases results either as they arrive or in submission order.
struct Collector {
    order: ResultOrder,
    next_index: usize,
    buffered: BTreeMap<usize, FetchResult>,
    results: Vec<FetchResult>,
}

impl Collector {
    fn new(order: ResultOrder) -> Self {
        Self {
            order,
            next_index: 0,
            buffered: BTreeMap::new(),
            results: Vec::new(),
        }
    }

    fn push<F: FnMut(&FetchResult)>(&mut self, result: FetchResult, on_result: &mut F) {
        match self.order {
            ResultOrder::Completion => self.emit(result, on_result),
            ResultOrder::Submission => {
                self.buffered.insert(result.target().index(), result);
                while let Some(ready) = self.buffered.remove(&self.next_index) {
                    self.next_index += 1;
                    self.emit(ready, on_result);
                }
            }
        }
    }

    fn finish<F: FnMut(&FetchResult)>(mut self, on_result: &mut F) -> Vec<FetchResult> {
        // Only non-empty if a task vanished without a result.
        let leftovers = std::mem::take(&mut self.buffered);
        for (_, result) in leftovers {
            self.emit(result, on_result);
        }
        self.results
    }

    fn emit<F: FnMut(&FetchResult)>(&mut self, result: FetchResult, on_result: &mut F) {
        on_result(&result);
        self.results.push(result);
    }
}

fn join_failure(err: JoinError) -> FetchError {
    if err.is_cancelled() {
        return FetchError::Cancelled;
    }
    match err.try_into_panic() {
        Ok(payload) => FetchError::Panicked(panic_message(payload)),
        Err(err) => FetchError::Panicked(err.to_string()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
