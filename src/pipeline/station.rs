//! Core station abstraction and the worker pool that runs it.

use crate::pipeline::error::{ErrorReporter, StationError};
use crate::pipeline::queue::StageQueue;
use crate::pipeline::types::Labeled;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A processing station in the pipeline.
///
/// A station transforms one item at a time, usually through a remote call.
/// One instance is shared by every worker of its pool, so `process` takes
/// `&self` and must not keep per-item state.
#[async_trait]
pub trait Station: Send + Sync + 'static {
    /// The input type this station receives.
    type Input: Labeled + Send + 'static;
    /// The output type this station produces.
    type Output: Send + 'static;

    /// Processes a single input item.
    ///
    /// An `Err` drops the item: it is reported and never reaches the next queue.
    async fn process(&self, input: Self::Input) -> Result<Self::Output, StationError>;

    /// Returns the name of this station for logging and error reporting.
    fn name(&self) -> &'static str;
}

/// Outcome counts of one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    completed: AtomicU64,
    failed: AtomicU64,
}

/// `size` workers pulling from one queue and feeding the next.
///
/// Dropping the pool without [`StationPool::shutdown`] aborts every worker
/// together with the transform it is running; the aborted items are never
/// marked done.
pub struct StationPool {
    name: &'static str,
    tasks: JoinSet<()>,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
}

impl StationPool {
    /// Spawns `size` workers for `station` (at least one).
    ///
    /// Each worker pops an item from `input`, processes it, pushes the result
    /// to `output` when there is one, and marks the item done whatever the
    /// outcome. Failures go to `error_reporter` with the item's label.
    pub fn spawn<S: Station>(
        station: Arc<S>,
        size: usize,
        input: Arc<StageQueue<S::Input>>,
        output: Option<Arc<StageQueue<S::Output>>>,
        error_reporter: Arc<dyn ErrorReporter>,
        cancel: CancellationToken,
    ) -> Self {
        let name = station.name();
        let counters = Arc::new(PoolCounters::default());
        let mut tasks = JoinSet::new();

        for _ in 0..size.max(1) {
            tasks.spawn(run_worker(
                station.clone(),
                input.clone(),
                output.clone(),
                error_reporter.clone(),
                cancel.clone(),
                counters.clone(),
            ));
        }

        tracing::debug!(station = name, workers = size.max(1), "Station pool started");

        Self {
            name,
            tasks,
            cancel,
            counters,
        }
    }

    /// Stops the workers and waits for every one of them to exit.
    ///
    /// Workers only observe cancellation while idle in `pop()`. Call this
    /// after the input queue has drained: at that point no worker holds an
    /// item, so nothing is abandoned. Called earlier, in-flight items still
    /// finish before their worker exits.
    pub async fn shutdown(mut self) -> PoolStats {
        self.cancel.cancel();

        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined
                && e.is_panic()
            {
                tracing::error!(station = self.name, "Worker panicked: {e}");
            }
        }

        tracing::debug!(station = self.name, "Station pool stopped");
        self.stats()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Returns the name of the station.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Main loop of one worker.
async fn run_worker<S: Station>(
    station: Arc<S>,
    input: Arc<StageQueue<S::Input>>,
    output: Option<Arc<StageQueue<S::Output>>>,
    error_reporter: Arc<dyn ErrorReporter>,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
) {
    // Holds the in-flight transform. Dropped with this worker, so an aborted
    // worker aborts its transform too.
    let mut in_flight = JoinSet::new();

    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            item = input.pop() => item,
        };

        let label = item.label();

        // Run the transform in its own task so a panic fails this item
        // instead of killing the worker before it can mark the item done.
        let task_station = station.clone();
        in_flight.spawn(async move { task_station.process(item).await });
        let result = match in_flight.join_next().await {
            Some(Ok(result)) => result,
            Some(Err(e)) => Err(StationError::transform(format!("station panicked: {e}"))),
            None => Err(StationError::transform("transform task vanished")),
        };

        match result {
            Ok(processed) => {
                if let Some(ref output) = output {
                    output.push(processed);
                }
                counters.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                error_reporter.report(station.name(), &label, &error);
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        input.mark_done();
    }
}
