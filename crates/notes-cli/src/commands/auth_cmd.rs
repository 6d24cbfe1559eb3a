use notes_core::config::NotesConfig;

use crate::auth::{load_stored_session, sign_out, AnonymousAuthService};
use crate::cli::AuthCommands;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands) -> Result<(), CliError> {
    let config = NotesConfig::load()?;
    let service = AnonymousAuthService::from_config(&config)
        .map_err(|error| CliError::Auth(error.to_string()))?;

    match command {
        AuthCommands::Login => {
            let service = service.ok_or(CliError::AuthNotConfigured)?;
            let session = service
                .ensure_signed_in()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed in anonymously as {}", session.user.id);
        }
        AuthCommands::Status => {
            let user = if let Some(service) = service {
                service
                    .current_user()
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?
            } else {
                load_stored_session(&config)
                    .map_err(|error| CliError::Auth(error.to_string()))?
                    .map(|session| session.user)
            };

            match user {
                Some(user) => println!("Signed in as {} (anonymous)", user.id),
                None => println!("Not signed in."),
            }
        }
        AuthCommands::Logout => {
            sign_out(&config).map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out");
        }
    }
    Ok(())
}
