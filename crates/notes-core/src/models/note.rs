//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Characters the realtime database refuses inside a key.
const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

/// Store-assigned note identifier (a push key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap an already validated key.
    pub(crate) const fn from_key(key: String) -> Self {
        Self(key)
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    /// Keys are taken verbatim; callers reading user input trim first.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        if key.trim().is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".to_string()));
        }
        if key.contains(FORBIDDEN_KEY_CHARS) || key.chars().any(char::is_control) {
            return Err(Error::InvalidInput(format!(
                "Note ID '{key}' contains characters not allowed in a key"
            )));
        }
        Ok(Self(key.to_string()))
    }
}

/// A note in the system
///
/// Every field is optional: records come back from a schemaless store and
/// unknown properties are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Note {
    /// Build the full record written under `id`.
    #[must_use]
    pub fn from_draft(id: NoteId, draft: &NoteDraft) -> Self {
        Self {
            id: Some(id),
            subject: Some(draft.subject.clone()),
            note_type: Some(draft.note_type.clone()),
            content: Some(draft.content.clone()),
        }
    }

    /// Replace the stored id with the key the record lives under.
    #[must_use]
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Editable copy of the fields, with missing values as empty strings.
    #[must_use]
    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            subject: self.subject.clone().unwrap_or_default(),
            note_type: self.note_type.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
        }
    }

    /// Subject for display, with a placeholder when missing.
    #[must_use]
    pub fn subject_label(&self) -> &str {
        self.subject.as_deref().unwrap_or("No subject")
    }

    /// Type for display, with a placeholder when missing.
    #[must_use]
    pub fn type_label(&self) -> &str {
        self.note_type.as_deref().unwrap_or("Unknown")
    }

    /// Content clipped to `max_lines` lines, with an ellipsis when clipped.
    #[must_use]
    pub fn content_preview(&self, max_lines: usize) -> String {
        let content = self.content.as_deref().unwrap_or("");
        let mut lines = content.lines();
        let shown = lines.by_ref().take(max_lines).collect::<Vec<_>>().join("\n");
        if lines.next().is_some() {
            format!("{shown}...")
        } else {
            shown
        }
    }
}

/// The editable part of a note, as held by the add and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub subject: String,
    pub note_type: String,
    pub content: String,
}

impl NoteDraft {
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        note_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            note_type: note_type.into(),
            content: content.into(),
        }
    }

    /// True when subject, type, and content are all non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.subject, &self.note_type, &self.content]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.subject.clear();
        self.note_type.clear();
        self.content.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(key: &str) -> NoteId {
        key.parse().unwrap()
    }

    #[test]
    fn note_id_rejects_empty_and_forbidden_keys() {
        assert!("".parse::<NoteId>().is_err());
        assert!("   ".parse::<NoteId>().is_err());
        assert!("a/b".parse::<NoteId>().is_err());
        assert!("a.b".parse::<NoteId>().is_err());
        assert!("-NxYz_09".parse::<NoteId>().is_ok());
    }

    #[test]
    fn note_id_keeps_surrounding_whitespace() {
        assert_eq!(id(" x").as_str(), " x");
        assert_ne!(id(" x"), id("x"));
    }

    #[test]
    fn note_serializes_type_field_and_skips_missing_values() {
        let note = Note {
            id: Some(id("-Nabc")),
            subject: Some("Math".to_string()),
            note_type: Some("lecture".to_string()),
            content: None,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "-Nabc", "subject": "Math", "type": "lecture"})
        );
    }

    #[test]
    fn note_ignores_unknown_properties() {
        let note: Note = serde_json::from_str(
            r#"{"subject":"Bio","type":"lab","content":"cells","color":"red","pinned":true}"#,
        )
        .unwrap();
        assert_eq!(note.subject.as_deref(), Some("Bio"));
        assert_eq!(note.note_type.as_deref(), Some("lab"));
        assert_eq!(note.content.as_deref(), Some("cells"));
        assert_eq!(note.id, None);
    }

    #[test]
    fn with_id_overrides_stored_id() {
        let note = Note {
            id: Some(id("stale")),
            ..Note::default()
        };
        assert_eq!(note.with_id(id("fresh")).id, Some(id("fresh")));
    }

    #[test]
    fn labels_fall_back_to_placeholders() {
        let note = Note::default();
        assert_eq!(note.subject_label(), "No subject");
        assert_eq!(note.type_label(), "Unknown");
        assert_eq!(note.content_preview(3), "");
    }

    #[test]
    fn content_preview_clips_to_line_limit() {
        let note = Note {
            content: Some("one\ntwo\nthree\nfour".to_string()),
            ..Note::default()
        };
        assert_eq!(note.content_preview(3), "one\ntwo\nthree...");
        assert_eq!(note.content_preview(4), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn draft_completeness_requires_all_fields() {
        assert!(NoteDraft::new("Math", "lecture", "limits").is_complete());
        assert!(!NoteDraft::new("Math", "  ", "limits").is_complete());
        assert!(!NoteDraft::default().is_complete());
    }

    #[test]
    fn draft_round_trips_missing_fields_as_empty() {
        let note = Note {
            subject: Some("Chem".to_string()),
            ..Note::default()
        };
        assert_eq!(note.draft(), NoteDraft::new("Chem", "", ""));

        let rebuilt = Note::from_draft(id("-K1"), &NoteDraft::new("a", "b", "c"));
        assert_eq!(rebuilt.id, Some(id("-K1")));
        assert_eq!(rebuilt.note_type.as_deref(), Some("b"));
    }
}
