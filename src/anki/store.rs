use crate::anki::note::Note;
use crate::error::{Result, VocardsError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Trait for the store notes are delivered to.
///
/// This trait allows swapping implementations (AnkiConnect vs mock).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Creates `note` and returns the id the store assigned.
    async fn add_note(&self, note: &Note) -> Result<i64>;
}

/// Implement NoteStore for Arc<T> to allow sharing across stations.
#[async_trait]
impl<T: NoteStore + ?Sized> NoteStore for Arc<T> {
    async fn add_note(&self, note: &Note) -> Result<i64> {
        (**self).add_note(note).await
    }
}

/// Mock store for testing. Accepts every note unless told otherwise.
#[derive(Debug)]
pub struct MockNoteStore {
    next_id: AtomicI64,
    reject_on: Vec<String>,
    notes: Mutex<Vec<Note>>,
}

impl Default for MockNoteStore {
    fn default() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            reject_on: Vec::new(),
            notes: Mutex::new(Vec::new()),
        }
    }
}

impl MockNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject notes whose front contains `needle`, the way Anki rejects duplicates.
    pub fn rejecting(mut self, needle: &str) -> Self {
        self.reject_on.push(needle.to_string());
        self
    }

    /// Notes accepted so far.
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn add_note(&self, note: &Note) -> Result<i64> {
        if self
            .reject_on
            .iter()
            .any(|needle| note.fields.front.contains(needle.as_str()))
        {
            return Err(VocardsError::Service {
                service: "mock store".to_string(),
                message: "cannot create note because it is a duplicate".to_string(),
            });
        }

        if let Ok(mut notes) = self.notes.lock() {
            notes.push(note.clone());
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}
