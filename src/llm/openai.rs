//! OpenAI-compatible chat completions client.

use crate::error::{Result, VocardsError};
use crate::http::check_status;
use crate::llm::generator::{ChatMessage, TextGenerator};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

const SERVICE: &str = "OpenAI chat";

/// Chat completions client.
#[derive(Clone)]
pub struct OpenAiChat {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Request body asking for a single JSON-object reply.
    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": messages,
        })
    }
}

/// Extracts the first choice's message text.
fn reply_text(body: &str) -> Result<String> {
    let completion: ChatCompletion = serde_json::from_str(body).map_err(|e| VocardsError::Service {
        service: SERVICE.to_string(),
        message: format!("unexpected response: {e}"),
    })?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| VocardsError::Service {
            service: SERVICE.to_string(),
            message: "response has no message content".to_string(),
        })
}

#[async_trait]
impl TextGenerator for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        let body = check_status(SERVICE, response)
            .await?
            .text()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        reply_text(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
