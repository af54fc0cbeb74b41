//! Card-making pipeline.
//!
//! Three station pools (enrich, speech, delivery) connected by unbounded
//! queues with a drain barrier. Each pool runs a fixed number of tokio
//! workers; the orchestrator seeds the first queue, waits for every queue to
//! drain in stage order, then shuts the pools down.

pub mod delivery_station;
pub mod enrich_station;
pub mod error;
pub mod orchestrator;
pub mod queue;
pub mod speech_station;
pub mod station;
pub mod types;

pub use delivery_station::DeliveryStation;
pub use enrich_station::EnrichStation;
pub use error::{ErrorReporter, LogReporter, StationError};
pub use orchestrator::{Pipeline, PipelineConfig, PipelinePhase, PipelineReport, StageReport};
pub use queue::{QueueStats, StageQueue};
pub use speech_station::SpeechStation;
pub use station::{PoolStats, Station, StationPool};
pub use types::{CardDraft, CardFields, Labeled, NoteReceipt, VocabPair, VoicedCard};
