//! OpenAI-compatible `audio/speech` client.

use crate::defaults;
use crate::error::{Result, VocardsError};
use crate::http::check_status;
use crate::tts::synthesizer::SpeechSynthesizer;
use async_trait::async_trait;
use serde_json::{Value, json};

const SERVICE: &str = "OpenAI speech";

/// Speech synthesis client producing mp3.
#[derive(Clone)]
pub struct OpenAiSpeech {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    voice: String,
}

impl OpenAiSpeech {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
        }
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
            "response_format": defaults::AUDIO_EXTENSION,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        let audio = check_status(SERVICE, response)
            .await?
            .bytes()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        if audio.is_empty() {
            return Err(VocardsError::Service {
                service: SERVICE.to_string(),
                message: "empty audio response".to_string(),
            });
        }

        Ok(audio.to_vec())
    }

    fn voice(&self) -> &str {
        &self.voice
    }
}
