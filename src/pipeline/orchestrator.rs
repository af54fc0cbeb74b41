//! Batch pipeline: vocabulary pairs → enrich → speech → delivery.

use crate::config::PipelineSettings;
use crate::defaults;
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::queue::{QueueStats, StageQueue};
use crate::pipeline::station::{PoolStats, Station, StationPool};
use crate::pipeline::types::VocabPair;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Worker counts per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub enrich_workers: usize,
    pub speech_workers: usize,
    pub delivery_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::uniform(defaults::CONCURRENCY)
    }
}

impl PipelineConfig {
    /// Same worker count for every stage.
    pub fn uniform(workers: usize) -> Self {
        Self {
            enrich_workers: workers,
            speech_workers: workers,
            delivery_workers: workers,
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self {
            enrich_workers: settings.enrich_workers(),
            speech_workers: settings.speech_workers(),
            delivery_workers: settings.delivery_workers(),
        }
    }
}

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Init,
    Seeded,
    Stage1Draining,
    Stage2Draining,
    Stage3Draining,
    Shutdown,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Init => "init",
            PipelinePhase::Seeded => "seeded",
            PipelinePhase::Stage1Draining => "enrich draining",
            PipelinePhase::Stage2Draining => "speech draining",
            PipelinePhase::Stage3Draining => "delivery draining",
            PipelinePhase::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Counts for one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Items pushed to the stage's input queue.
    pub received: u64,
    /// Items the stage's input queue saw marked done.
    pub done: u64,
    pub completed: u64,
    pub failed: u64,
}

impl StageReport {
    fn new(queue: QueueStats, stats: PoolStats) -> Self {
        Self {
            received: queue.pushed,
            done: queue.done,
            completed: stats.completed,
            failed: stats.failed,
        }
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub seeded: u64,
    pub enrich: StageReport,
    pub speech: StageReport,
    pub delivery: StageReport,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Notes the store accepted.
    pub fn delivered(&self) -> u64 {
        self.delivery.completed
    }

    /// Items dropped at any stage.
    pub fn dropped(&self) -> u64 {
        self.enrich.failed + self.speech.failed + self.delivery.failed
    }
}

/// Three station pools joined by drain-aware queues.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
}

impl Pipeline {
    /// Creates a new pipeline with default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Runs every pair through the three stations and returns once all of
    /// them were delivered or dropped.
    ///
    /// Queues are drained in stage order: a later queue can only be waited
    /// on once nothing upstream can still feed it. Per-item failures are
    /// reported and counted, never returned.
    pub async fn run<E, S, D>(
        self,
        pairs: impl IntoIterator<Item = VocabPair>,
        enrich: Arc<E>,
        speech: Arc<S>,
        delivery: Arc<D>,
    ) -> PipelineReport
    where
        E: Station<Input = VocabPair>,
        S: Station<Input = E::Output>,
        D: Station<Input = S::Output>,
    {
        let started = Instant::now();
        let mut phase = PipelinePhase::Init;
        tracing::debug!(%phase, config = ?self.config, "Pipeline phase");

        let enrich_in = Arc::new(StageQueue::<VocabPair>::new());
        let speech_in = Arc::new(StageQueue::<E::Output>::new());
        let delivery_in = Arc::new(StageQueue::<S::Output>::new());
        let cancel = CancellationToken::new();

        for pair in pairs {
            enrich_in.push(pair);
        }
        let seeded = enrich_in.stats().pushed;

        let enrich_pool = StationPool::spawn(
            enrich,
            self.config.enrich_workers,
            enrich_in.clone(),
            Some(speech_in.clone()),
            self.error_reporter.clone(),
            cancel.child_token(),
        );
        let speech_pool = StationPool::spawn(
            speech,
            self.config.speech_workers,
            speech_in.clone(),
            Some(delivery_in.clone()),
            self.error_reporter.clone(),
            cancel.child_token(),
        );
        let delivery_pool = StationPool::spawn(
            delivery,
            self.config.delivery_workers,
            delivery_in.clone(),
            None,
            self.error_reporter.clone(),
            cancel.child_token(),
        );
        transition(&mut phase, PipelinePhase::Seeded);
        tracing::info!(items = seeded, "Pipeline started");

        transition(&mut phase, PipelinePhase::Stage1Draining);
        enrich_in.wait_until_drained().await;
        transition(&mut phase, PipelinePhase::Stage2Draining);
        speech_in.wait_until_drained().await;
        transition(&mut phase, PipelinePhase::Stage3Draining);
        delivery_in.wait_until_drained().await;

        transition(&mut phase, PipelinePhase::Shutdown);
        cancel.cancel();
        let enrich_stats = enrich_pool.shutdown().await;
        let speech_stats = speech_pool.shutdown().await;
        let delivery_stats = delivery_pool.shutdown().await;

        let report = PipelineReport {
            seeded,
            enrich: StageReport::new(enrich_in.stats(), enrich_stats),
            speech: StageReport::new(speech_in.stats(), speech_stats),
            delivery: StageReport::new(delivery_in.stats(), delivery_stats),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            seeded = report.seeded,
            delivered = report.delivered(),
            dropped = report.dropped(),
            elapsed = %humantime::format_duration(round_to_millis(report.elapsed)),
            "Pipeline finished"
        );
        report
    }
}

fn transition(phase: &mut PipelinePhase, next: PipelinePhase) {
    tracing::debug!(from = %phase, to = %next, "Pipeline phase");
    *phase = next;
}

fn round_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis().try_into().unwrap_or(u64::MAX))
}
