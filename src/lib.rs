//! vocards - Turn vocabulary lists into voiced Anki cards
//!
//! Each `word - meaning` line is enriched by a chat model, voiced by a speech
//! model and added to Anki through AnkiConnect, with every stage running its
//! own pool of concurrent workers.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod anki;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod http;
pub mod llm;
pub mod pipeline;
pub mod tts;
pub mod vocab;

// Composition root - needs everything
pub mod app;

// Service traits (one per remote dependency)
pub use anki::store::NoteStore;
pub use llm::generator::TextGenerator;
pub use tts::synthesizer::SpeechSynthesizer;

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineReport};

// Error handling
pub use error::{Result, VocardsError};

// Config
pub use config::Config;

// Station framework
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_has_hash_only_when_built_from_git() {
        let ver = version_string();
        match option_env!("GIT_HASH") {
            Some(hash) if !hash.is_empty() => {
                assert_eq!(ver.split_once('+').map(|(_, h)| h), Some(hash));
            }
            _ => assert_eq!(ver, env!("CARGO_PKG_VERSION")),
        }
    }
}
