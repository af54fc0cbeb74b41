//! Records handed from station to station.
//!
//! Each record is owned by exactly one station at a time: it moves by value out
//! of a queue, through `Station::process`, and into the next queue.

use std::path::PathBuf;

/// Something a failed item can be identified by in logs.
pub trait Labeled {
    fn label(&self) -> String;
}

/// One parsed vocabulary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabPair {
    /// Left side of the line: the word being learned.
    pub translated: String,
    /// Right side of the line: its meaning.
    pub original: String,
}

impl VocabPair {
    pub fn new(translated: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            translated: translated.into(),
            original: original.into(),
        }
    }
}

impl Labeled for VocabPair {
    fn label(&self) -> String {
        format!("{} – {}", self.translated, self.original)
    }
}

/// Card text produced by the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub front: String,
    pub back: String,
    /// Plain phrase sent to speech synthesis (no stress marks or notes).
    pub pure: String,
}

/// A vocabulary pair enriched with card text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub pair: VocabPair,
    pub fields: CardFields,
}

impl Labeled for CardDraft {
    fn label(&self) -> String {
        self.pair.label()
    }
}

/// A card whose audio has been written to local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicedCard {
    pub draft: CardDraft,
    pub audio_path: PathBuf,
}

impl Labeled for VoicedCard {
    fn label(&self) -> String {
        self.draft.label()
    }
}

/// Id assigned to a note by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteReceipt {
    pub note_id: i64,
}
