use crate::error::{Result, VocardsError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Trait for speech synthesis.
///
/// This trait allows swapping implementations (real API vs mock).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return the encoded audio (mp3).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Name of the voice speaking.
    fn voice(&self) -> &str;
}

/// Implement SpeechSynthesizer for Arc<T> to allow sharing across stations.
#[async_trait]
impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Arc<T> {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        (**self).synthesize(text).await
    }

    fn voice(&self) -> &str {
        (**self).voice()
    }
}

/// Mock synthesizer for testing.
///
/// Returns a fixed payload, or the UTF-8 bytes of the text when none is set.
#[derive(Debug, Default)]
pub struct MockSpeechSynthesizer {
    payload: Option<Vec<u8>>,
    fail_on: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `payload` for every request.
    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(payload.to_vec());
        self
    }

    /// Fail whenever the text contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Texts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }

        if self.fail_on.iter().any(|needle| text.contains(needle.as_str())) {
            return Err(VocardsError::Service {
                service: "mock speech".to_string(),
                message: format!("refused: {text}"),
            });
        }

        Ok(self
            .payload
            .clone()
            .unwrap_or_else(|| text.as_bytes().to_vec()))
    }

    fn voice(&self) -> &str {
        "mock"
    }
}
