use notes_core::screens::EditScreen;

use crate::commands::common::{fetch_note, open_service, parse_note_id, StoreTarget};
use crate::error::CliError;

/// Field overrides from the command line; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct EditFields {
    pub subject: Option<String>,
    pub note_type: Option<String>,
    pub content: Option<String>,
}

impl EditFields {
    const fn is_empty(&self) -> bool {
        self.subject.is_none() && self.note_type.is_none() && self.content.is_none()
    }
}

pub async fn run_edit(id: &str, fields: EditFields, target: &StoreTarget) -> Result<(), CliError> {
    if fields.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let id = parse_note_id(id)?;
    let service = open_service(target).await?;
    let note = fetch_note(&service, &id).await?;

    let mut screen = EditScreen::open(&note);
    screen.load(&service).await;
    if let Some(subject) = fields.subject {
        screen.draft.subject = subject;
    }
    if let Some(note_type) = fields.note_type {
        screen.draft.note_type = note_type;
    }
    if let Some(content) = fields.content {
        screen.draft.content = content;
    }

    if !screen.save(&service).await {
        return Err(CliError::Rejected(screen.info));
    }

    eprintln!("{}", screen.info);
    println!("{id}");
    Ok(())
}
