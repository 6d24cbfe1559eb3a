//! Data models for Notes

mod note;
mod push_id;

pub use note::{Note, NoteDraft, NoteId};
pub use push_id::PushIdGenerator;
