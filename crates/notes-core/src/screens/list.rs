use super::CARD_PREVIEW_LINES;
use crate::models::{Note, NoteId};
use crate::store::SubscriptionEvent;

/// Display strings for one list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: Option<NoteId>,
    pub title: String,
    pub type_line: String,
    pub preview: String,
}

impl From<&Note> for NoteCard {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.subject_label().to_string(),
            type_line: format!("Type: {}", note.type_label()),
            preview: note.content_preview(CARD_PREVIEW_LINES),
        }
    }
}

/// Live list state fed by a collection subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScreen {
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
}

impl Default for ListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ListScreen {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            notes: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn apply(&mut self, event: SubscriptionEvent) {
        match event {
            SubscriptionEvent::Snapshot(notes) => {
                self.notes = notes;
                self.error = None;
            }
            SubscriptionEvent::Cancelled(reason) => {
                tracing::warn!("Note list listener cancelled: {reason}");
                self.error = Some(reason);
            }
        }
        self.loading = false;
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reason the listener stopped, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether to render the empty-state hint instead of cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.loading && self.notes.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> Vec<NoteCard> {
        self.notes.iter().map(NoteCard::from).collect()
    }

    #[must_use]
    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id.as_ref() == Some(id))
    }
}
