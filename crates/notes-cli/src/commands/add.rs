use notes_core::screens::AddScreen;
use notes_core::NoteDraft;

use crate::commands::common::{open_service, StoreTarget};
use crate::error::CliError;

pub async fn run_add(draft: NoteDraft, target: &StoreTarget) -> Result<(), CliError> {
    let service = open_service(target).await?;
    let mut screen = AddScreen {
        draft,
        ..AddScreen::new()
    };

    let Some(note) = screen.save(&service).await else {
        return Err(CliError::Rejected(screen.info));
    };

    eprintln!("{}", screen.info);
    if let Some(id) = note.id {
        println!("{id}");
    }
    Ok(())
}
