use super::{FILL_ALL_FIELDS, NOTE_SAVED};
use crate::models::{Note, NoteDraft};
use crate::store::NoteService;

/// Form state of the add screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddScreen {
    pub draft: NoteDraft,
    pub info: String,
}

impl AddScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the draft under a fresh key; the form is cleared on success.
    pub async fn save(&mut self, service: &NoteService) -> Option<Note> {
        if !self.draft.is_complete() {
            self.info = FILL_ALL_FIELDS.to_string();
            return None;
        }

        match service.create(&self.draft).await {
            Ok(note) => {
                self.draft.clear();
                self.info = NOTE_SAVED.to_string();
                Some(note)
            }
            Err(error) => {
                tracing::warn!("Failed to save note: {error}");
                self.info = format!("Error: {error}");
                None
            }
        }
    }
}
