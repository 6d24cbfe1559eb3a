//! Notes CLI - create, browse, and edit notes from the terminal
//!
//! Talks to the same realtime database collection as the mobile app, or to a
//! local SQLite file with `--local`.

mod auth;
mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use notes_core::NoteDraft;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::StoreTarget;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditFields};
use crate::commands::list::run_list;
use crate::commands::sensors::run_sensors;
use crate::commands::show::run_show;
use crate::commands::watch::run_watch;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "notes=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = StoreTarget::new(cli.local, cli.db_path);

    match cli.command {
        Some(Commands::Add {
            subject,
            note_type,
            content,
        }) => run_add(NoteDraft::new(subject, note_type, content), &target).await?,
        Some(Commands::List { json }) => run_list(json, &target).await?,
        Some(Commands::Show { id, json }) => run_show(&id, json, &target).await?,
        Some(Commands::Edit {
            id,
            subject,
            note_type,
            content,
        }) => {
            let fields = EditFields {
                subject,
                note_type,
                content,
            };
            run_edit(&id, fields, &target).await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, &target).await?,
        Some(Commands::Watch) => run_watch(&target).await?,
        Some(Commands::Auth { command }) => run_auth(command).await?,
        Some(Commands::Config { command }) => run_config(command)?,
        Some(Commands::Sensors { command }) => run_sensors(command, &target).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
