use notes_core::screens::ListScreen;
use notes_core::store::SubscriptionEvent;

use crate::commands::common::{format_list, open_service, StoreTarget};
use crate::error::CliError;

pub async fn run_list(as_json: bool, target: &StoreTarget) -> Result<(), CliError> {
    let service = open_service(target).await?;
    let notes = service.list().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    let mut screen = ListScreen::new();
    screen.apply(SubscriptionEvent::Snapshot(notes));
    for line in format_list(&screen) {
        println!("{line}");
    }
    Ok(())
}
