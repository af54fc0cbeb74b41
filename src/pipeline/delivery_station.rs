//! Delivery station: adds the finished card to the note store.

use crate::anki::note::NoteTemplate;
use crate::anki::store::NoteStore;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::{NoteReceipt, VoicedCard};
use async_trait::async_trait;
use std::sync::Arc;

pub struct DeliveryStation {
    store: Arc<dyn NoteStore>,
    template: NoteTemplate,
}

impl DeliveryStation {
    pub fn new(store: Arc<dyn NoteStore>, template: NoteTemplate) -> Self {
        Self { store, template }
    }
}

#[async_trait]
impl Station for DeliveryStation {
    type Input = VoicedCard;
    type Output = NoteReceipt;

    fn name(&self) -> &'static str {
        "delivery"
    }

    async fn process(&self, card: VoicedCard) -> Result<NoteReceipt, StationError> {
        let audio = tokio::fs::read(&card.audio_path).await.map_err(|e| {
            StationError::delivery(format!(
                "cannot read {}: {e}",
                card.audio_path.display()
            ))
        })?;

        let filename = card
            .audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                StationError::delivery(format!(
                    "audio path has no file name: {}",
                    card.audio_path.display()
                ))
            })?;

        let note = self.template.build(&card.draft, &filename, &audio);
        let note_id = self
            .store
            .add_note(&note)
            .await
            .map_err(StationError::delivery)?;

        tracing::info!(item = %card.draft.pair.original, note_id, "Note added");
        Ok(NoteReceipt { note_id })
    }
}
