//! Toolkit-independent view models for the add, list, and edit screens.
//!
//! Every operation turns store failures into the screen's `info` line
//! instead of returning them.

mod add;
mod app;
mod edit;
mod list;

pub use add::AddScreen;
pub use app::{NotesApp, Screen};
pub use edit::EditScreen;
pub use list::{ListScreen, NoteCard};

use crate::models::NoteId;
use crate::store::NoteService;

pub const NOTE_SAVED: &str = "Note saved";
pub const FILL_ALL_FIELDS: &str = "Fill in all fields";
pub const NOTE_UPDATED: &str = "Note updated";
pub const NOTE_DELETED: &str = "Note deleted";
pub const MISSING_NOTE_ID: &str = "Missing note id";
pub const EMPTY_LIST_HINT: &str = "No notes yet. Add one from the Add tab.";

/// Lines of content shown on a list card.
pub const CARD_PREVIEW_LINES: usize = 3;

/// Remove the note under `id`, returning the status line and whether it went.
pub async fn delete_note(service: &NoteService, id: Option<&NoteId>) -> (String, bool) {
    let Some(id) = id else {
        return (MISSING_NOTE_ID.to_string(), false);
    };
    match service.delete(id).await {
        Ok(()) => (NOTE_DELETED.to_string(), true),
        Err(error) => {
            tracing::warn!("Failed to delete note {id}: {error}");
            (format!("Delete error: {error}"), false)
        }
    }
}
