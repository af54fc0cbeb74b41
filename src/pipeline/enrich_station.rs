//! Enrichment station: asks the completion service for card text.

use crate::error::{Result, VocardsError};
use crate::llm::generator::{ChatMessage, TextGenerator};
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::{CardDraft, CardFields, Labeled, VocabPair};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Reply shape requested by the prompt.
#[derive(Debug, Deserialize)]
struct CardReply {
    front: String,
    back: String,
    #[serde(alias = "pure_russian", alias = "pure_text")]
    pure: String,
}

/// Removes a surrounding markdown code fence (```` ```json ... ``` ````), if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.split_once('\n') {
        // First line is the info string ("json") or empty.
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

impl CardFields {
    /// Decodes a completion reply into card fields.
    ///
    /// The reply must be a JSON object with non-empty string fields `front`,
    /// `back` and `pure`. Anything else is an error; no partial record is
    /// ever produced.
    pub fn decode(reply: &str) -> Result<Self> {
        let body = strip_code_fence(reply);
        let parsed: CardReply = serde_json::from_str(body).map_err(|e| VocardsError::Decode {
            message: e.to_string(),
        })?;

        for (name, value) in [
            ("front", &parsed.front),
            ("back", &parsed.back),
            ("pure", &parsed.pure),
        ] {
            if value.trim().is_empty() {
                return Err(VocardsError::Decode {
                    message: format!("field `{name}` is empty"),
                });
            }
        }

        Ok(Self {
            front: parsed.front.trim().to_string(),
            back: parsed.back.trim().to_string(),
            pure: parsed.pure.trim().to_string(),
        })
    }
}

/// Station turning a vocabulary pair into card text.
pub struct EnrichStation {
    generator: Arc<dyn TextGenerator>,
    instructions: String,
}

impl EnrichStation {
    /// Creates the station with the instruction text sent as system message.
    pub fn new(generator: Arc<dyn TextGenerator>, instructions: impl Into<String>) -> Self {
        Self {
            generator,
            instructions: instructions.into(),
        }
    }

    fn messages(&self, pair: &VocabPair) -> [ChatMessage; 2] {
        [
            ChatMessage::system(self.instructions.clone()),
            ChatMessage::user(pair.label()),
        ]
    }
}

#[async_trait]
impl Station for EnrichStation {
    type Input = VocabPair;
    type Output = CardDraft;

    fn name(&self) -> &'static str {
        "enrich"
    }

    async fn process(&self, pair: VocabPair) -> std::result::Result<CardDraft, StationError> {
        let reply = self.generator.complete(&self.messages(&pair)).await?;
        let fields = CardFields::decode(&reply)?;

        tracing::info!(item = %pair.original, "Enriched");
        Ok(CardDraft { pair, fields })
    }
}
