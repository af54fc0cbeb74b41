//! Speech station: synthesizes the card's phrase and stores the audio locally.

use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::{CardDraft, VoicedCard};
use crate::tts::storage::AudioStore;
use crate::tts::synthesizer::SpeechSynthesizer;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SpeechStation {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: AudioStore,
}

impl SpeechStation {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: AudioStore) -> Self {
        Self { synthesizer, store }
    }
}

#[async_trait]
impl Station for SpeechStation {
    type Input = CardDraft;
    type Output = VoicedCard;

    fn name(&self) -> &'static str {
        "speech"
    }

    /// Synthesizes `fields.pure` and saves it under a name derived from
    /// `pair.translated`. The card only moves on once the file is synced.
    async fn process(&self, draft: CardDraft) -> Result<VoicedCard, StationError> {
        let audio = self.synthesizer.synthesize(&draft.fields.pure).await?;
        if audio.is_empty() {
            return Err(StationError::transform("speech service returned no audio"));
        }

        let audio_path = self.store.save(&draft.pair.translated, &audio).await?;

        tracing::info!(
            item = %draft.pair.original,
            file = %audio_path.display(),
            bytes = audio.len(),
            "Speech saved"
        );
        Ok(VoicedCard { draft, audio_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{CardFields, VocabPair};
    use crate::tts::synthesizer::MockSpeechSynthesizer;
    use tempfile::TempDir;

    fn draft(translated: &str, pure: &str) -> CardDraft {
        CardDraft {
            pair: VocabPair::new(translated, "cat"),
            fields: CardFields {
                front: "cat".to_string(),
                back: "ко́т".to_string(),
                pure: pure.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_process_writes_artifact_before_returning() {
        let dir = TempDir::new().unwrap();
        let synth = Arc::new(MockSpeechSynthesizer::new().with_payload(b"ID3audio"));
        let station = SpeechStation::new(synth.clone(), AudioStore::new(dir.path()));

        let voiced = station.process(draft("кот", "кот")).await.unwrap();

        assert_eq!(voiced.audio_path, dir.path().join("кот.mp3"));
        assert_eq!(std::fs::read(&voiced.audio_path).unwrap(), b"ID3audio");
        assert_eq!(voiced.draft.pair.translated, "кот");
    }

    #[tokio::test]
    async fn test_speaks_pure_but_names_after_translated() {
        let dir = TempDir::new().unwrap();
        let synth = Arc::new(MockSpeechSynthesizer::new());
        let station = SpeechStation::new(synth.clone(), AudioStore::new(dir.path()));

        let voiced = station
            .process(draft("добрый день!", "Добрый день"))
            .await
            .unwrap();

        assert_eq!(synth.calls(), vec!["Добрый день"]);
        assert_eq!(voiced.audio_path, dir.path().join("добрый_день_.mp3"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let synth = Arc::new(MockSpeechSynthesizer::new().failing_on("кот"));
        let station = SpeechStation::new(synth, AudioStore::new(dir.path()));

        let err = station.process(draft("кот", "кот")).await.unwrap_err();

        assert!(matches!(err, StationError::Transform(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_audio_is_an_error() {
        let dir = TempDir::new().unwrap();
        let synth = Arc::new(MockSpeechSynthesizer::new().with_payload(b""));
        let station = SpeechStation::new(synth, AudioStore::new(dir.path()));

        let err = station.process(draft("кот", "кот")).await.unwrap_err();

        assert!(err.to_string().contains("no audio"), "got: {err}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = AudioStore::new(dir.path().join("missing"));
        let station = SpeechStation::new(Arc::new(MockSpeechSynthesizer::new()), store);

        assert!(station.process(draft("кот", "кот")).await.is_err());
    }
}
