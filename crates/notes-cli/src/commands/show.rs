use crate::commands::common::{
    fetch_note, format_note_detail, open_service, parse_note_id, StoreTarget,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, target: &StoreTarget) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    let service = open_service(target).await?;
    let note = fetch_note(&service, &id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        for line in format_note_detail(&note) {
            println!("{line}");
        }
    }
    Ok(())
}
