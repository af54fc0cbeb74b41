//! Note payloads in the shape AnkiConnect's `addNote` expects.

use crate::pipeline::types::CardDraft;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Field the audio is attached to; it plays when the back is shown.
pub const AUDIO_FIELD: &str = "Back";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub audio: Vec<AudioAttachment>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFields {
    #[serde(rename = "Front")]
    pub front: String,
    #[serde(rename = "Back")]
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttachment {
    pub filename: String,
    /// Base64 of the file contents.
    pub data: String,
    pub fields: Vec<String>,
}

/// Deck, note type and tags shared by every note of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTemplate {
    pub deck: String,
    pub model: String,
    pub tags: Vec<String>,
}

impl NoteTemplate {
    pub fn new(deck: impl Into<String>, model: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            deck: deck.into(),
            model: model.into(),
            tags,
        }
    }

    /// Builds the note for `draft` with `audio` attached as `filename`.
    pub fn build(&self, draft: &CardDraft, filename: &str, audio: &[u8]) -> Note {
        Note {
            deck_name: self.deck.clone(),
            model_name: self.model.clone(),
            fields: NoteFields {
                front: draft.fields.front.clone(),
                back: html_line_breaks(&draft.fields.back),
            },
            audio: vec![AudioAttachment {
                filename: filename.to_string(),
                data: STANDARD.encode(audio),
                fields: vec![AUDIO_FIELD.to_string()],
            }],
            tags: self.tags.clone(),
        }
    }
}

/// Anki renders fields as HTML; plain newlines would collapse.
fn html_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}
