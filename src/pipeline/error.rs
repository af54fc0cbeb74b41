//! Error types and reporting for pipeline stations.

use crate::error::VocardsError;
use std::fmt;

/// Per-item failure of a station. The item is dropped; the pipeline goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    /// The external call failed, timed out, or returned unusable data.
    Transform(String),
    /// The note store rejected the note or could not be reached.
    Delivery(String),
}

impl StationError {
    pub fn transform(error: impl fmt::Display) -> Self {
        StationError::Transform(error.to_string())
    }

    pub fn delivery(error: impl fmt::Display) -> Self {
        StationError::Delivery(error.to_string())
    }
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Transform(msg) => write!(f, "Transform failed: {}", msg),
            StationError::Delivery(msg) => write!(f, "Delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for StationError {}

impl From<VocardsError> for StationError {
    fn from(error: VocardsError) -> Self {
        StationError::transform(error)
    }
}

/// Trait for reporting dropped items.
pub trait ErrorReporter: Send + Sync {
    /// Reports that `item` failed in `station` and was dropped.
    fn report(&self, station: &str, item: &str, error: &StationError);
}

/// Reporter that emits one `error` event per dropped item.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, item: &str, error: &StationError) {
        tracing::error!(station, item, "{}", error);
    }
}
