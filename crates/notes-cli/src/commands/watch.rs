use notes_core::screens::ListScreen;
use notes_core::store::SubscriptionEvent;

use crate::commands::common::{format_list, open_service, StoreTarget};
use crate::error::CliError;

/// Print the list after every change until interrupted or cancelled.
pub async fn run_watch(target: &StoreTarget) -> Result<(), CliError> {
    let service = open_service(target).await?;
    let mut subscription = service.subscribe().await?;
    let mut screen = ListScreen::new();
    eprintln!("Watching notes (Ctrl-C to stop)...");

    loop {
        let event = tokio::select! {
            event = subscription.next() => event,
            _ = tokio::signal::ctrl_c() => None,
        };

        let Some(event) = event else {
            return Ok(());
        };
        let cancelled = match &event {
            SubscriptionEvent::Cancelled(reason) => Some(reason.clone()),
            SubscriptionEvent::Snapshot(_) => None,
        };
        screen.apply(event);

        if let Some(reason) = cancelled {
            return Err(CliError::ListenerCancelled(reason));
        }
        println!("--- {} note(s)", screen.notes().len());
        for line in format_list(&screen) {
            println!("{line}");
        }
    }
}
