use notes_core::screens::EditScreen;

use crate::commands::common::{fetch_note, open_service, parse_note_id, StoreTarget};
use crate::error::CliError;

pub async fn run_delete(id: &str, target: &StoreTarget) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    let service = open_service(target).await?;
    let note = fetch_note(&service, &id).await?;

    let mut screen = EditScreen::open(&note);
    if !screen.delete(&service).await {
        return Err(CliError::Rejected(screen.info));
    }

    eprintln!("{}", screen.info);
    println!("{id}");
    Ok(())
}
