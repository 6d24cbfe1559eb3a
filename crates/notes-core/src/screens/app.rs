use super::delete_note;
use crate::models::{Note, NoteId};
use crate::store::NoteService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Add,
    List,
    Edit,
}

/// Navigation state shared by the screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesApp {
    screen: Screen,
    editing: Option<Note>,
}

impl NotesApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// The note passed to the edit screen.
    #[must_use]
    pub const fn editing(&self) -> Option<&Note> {
        self.editing.as_ref()
    }

    #[must_use]
    pub fn editing_id(&self) -> Option<&NoteId> {
        self.editing.as_ref().and_then(|note| note.id.as_ref())
    }

    /// Bottom-bar navigation; only Add and List are reachable this way.
    pub fn show_add(&mut self) {
        self.editing = None;
        self.screen = Screen::Add;
    }

    pub fn show_list(&mut self) {
        self.editing = None;
        self.screen = Screen::List;
    }

    /// List → edit for the tapped note.
    pub fn open_note(&mut self, note: Note) {
        self.editing = Some(note);
        self.screen = Screen::Edit;
    }

    /// Leave the edit screen.
    pub fn back(&mut self) {
        self.show_list();
    }

    /// Take the note a shake should delete, leaving the edit screen.
    ///
    /// Returns `None` and changes nothing when no note is being edited.
    pub fn take_shake_target(&mut self) -> Option<NoteId> {
        let id = self.editing_id()?.clone();
        self.back();
        Some(id)
    }

    /// Delete the note being edited, if any, and return the status line.
    pub async fn on_shake(&mut self, service: &NoteService) -> Option<String> {
        let id = self.take_shake_target()?;
        tracing::info!("Shake detected, deleting note {id}");
        let (info, _) = delete_note(service, Some(&id)).await;
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteDraft;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_on_add_and_navigates() {
        let mut app = NotesApp::new();
        assert_eq!(app.screen(), Screen::Add);

        app.show_list();
        assert_eq!(app.screen(), Screen::List);

        let note = Note::from_draft("-A".parse().unwrap(), &NoteDraft::new("a", "b", "c"));
        app.open_note(note.clone());
        assert_eq!(app.screen(), Screen::Edit);
        assert_eq!(app.editing(), Some(&note));

        app.back();
        assert_eq!(app.screen(), Screen::List);
        assert_eq!(app.editing_id(), None);
    }

    #[tokio::test]
    async fn shake_deletes_edited_note_and_clears_id() {
        let service = NoteService::open_in_memory();
        let note = service
            .create(&NoteDraft::new("Chem", "lab", "titration"))
            .await
            .unwrap();

        let mut app = NotesApp::new();
        app.open_note(note);
        assert_eq!(app.on_shake(&service).await.as_deref(), Some("Note deleted"));
        assert_eq!(app.editing_id(), None);
        assert_eq!(app.screen(), Screen::List);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[test]
    fn tab_navigation_leaves_edit_screen() {
        let mut app = NotesApp::new();
        app.open_note(Note::from_draft(
            "-A".parse().unwrap(),
            &NoteDraft::new("a", "b", "c"),
        ));
        app.show_add();
        assert_eq!(app.screen(), Screen::Add);
        assert_eq!(app.take_shake_target(), None);
    }

    #[tokio::test]
    async fn shake_without_edited_note_does_nothing() {
        let service = NoteService::open_in_memory();
        let kept = service
            .create(&NoteDraft::new("Chem", "lab", "titration"))
            .await
            .unwrap();

        let mut app = NotesApp::new();
        app.show_list();
        assert_eq!(app.on_shake(&service).await, None);
        assert_eq!(app.screen(), Screen::List);
        assert_eq!(service.list().await.unwrap(), vec![kept]);
    }
}
