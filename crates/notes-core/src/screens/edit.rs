use super::{delete_note, MISSING_NOTE_ID, NOTE_UPDATED};
use crate::models::{Note, NoteDraft, NoteId};
use crate::store::NoteService;

/// Form state of the edit screen for one note.
///
/// `save` and `delete` return `true` when the caller should navigate back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScreen {
    id: Option<NoteId>,
    pub draft: NoteDraft,
    pub info: String,
}

impl EditScreen {
    /// Open with the fields of the note passed from the list.
    #[must_use]
    pub fn open(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            draft: note.draft(),
            info: String::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<&NoteId> {
        self.id.as_ref()
    }

    /// Refresh the fields from a keyed read of the stored note.
    pub async fn load(&mut self, service: &NoteService) {
        let Some(id) = &self.id else {
            return;
        };
        match service.get(id).await {
            Ok(Some(note)) => self.draft = note.draft(),
            Ok(None) => tracing::debug!("Note {id} no longer exists"),
            Err(error) => tracing::warn!("Failed to load note {id}: {error}"),
        }
    }

    /// Overwrite the stored note with the current fields.
    pub async fn save(&mut self, service: &NoteService) -> bool {
        let Some(id) = &self.id else {
            self.info = MISSING_NOTE_ID.to_string();
            return false;
        };
        match service.update(id, &self.draft).await {
            Ok(_) => {
                self.info = NOTE_UPDATED.to_string();
                true
            }
            Err(error) => {
                tracing::warn!("Failed to update note {id}: {error}");
                self.info = format!("Save error: {error}");
                false
            }
        }
    }

    pub async fn delete(&mut self, service: &NoteService) -> bool {
        let (info, deleted) = delete_note(service, self.id.as_ref()).await;
        self.info = info;
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RealtimeDbStore;
    use pretty_assertions::assert_eq;

    async fn saved_note(service: &NoteService) -> Note {
        service
            .create(&NoteDraft::new("History", "essay", "draft one"))
            .await
            .unwrap()
    }

    /// Store pointing at a closed local port, so every call fails.
    fn unreachable_service() -> NoteService {
        NoteService::new(RealtimeDbStore::new("http://127.0.0.1:9", "notes", None).unwrap())
    }

    #[tokio::test]
    async fn load_refreshes_fields_from_store() {
        let service = NoteService::open_in_memory();
        let note = saved_note(&service).await;
        let stale = Note {
            subject: Some("stale".to_string()),
            content: None,
            ..note.clone()
        };

        let mut screen = EditScreen::open(&stale);
        assert_eq!(screen.draft.content, "");
        screen.load(&service).await;
        assert_eq!(screen.draft, note.draft());
    }

    #[tokio::test]
    async fn save_overwrites_and_navigates_back() {
        let service = NoteService::open_in_memory();
        let note = saved_note(&service).await;

        let mut screen = EditScreen::open(&note);
        screen.draft.content = "draft two".to_string();
        assert!(screen.save(&service).await);
        assert_eq!(screen.info, "Note updated");

        let stored = service.get(note.id.as_ref().unwrap()).await.unwrap();
        assert_eq!(stored.unwrap().content.as_deref(), Some("draft two"));
    }

    #[tokio::test]
    async fn delete_removes_note() {
        let service = NoteService::open_in_memory();
        let note = saved_note(&service).await;

        let mut screen = EditScreen::open(&note);
        assert!(screen.delete(&service).await);
        assert_eq!(screen.info, "Note deleted");
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_id_is_reported() {
        let service = NoteService::open_in_memory();
        let mut screen = EditScreen::open(&Note::default());

        assert!(!screen.save(&service).await);
        assert_eq!(screen.info, "Missing note id");
        assert!(!screen.delete(&service).await);
        assert_eq!(screen.info, "Missing note id");
    }

    #[tokio::test]
    async fn store_failures_become_status_lines() {
        let service = unreachable_service();
        let note = Note::from_draft("-A".parse().unwrap(), &NoteDraft::new("a", "b", "c"));
        let mut screen = EditScreen::open(&note);

        assert!(!screen.save(&service).await);
        assert!(screen.info.starts_with("Save error: "));
        assert!(!screen.delete(&service).await);
        assert!(screen.info.starts_with("Delete error: "));
    }
}
