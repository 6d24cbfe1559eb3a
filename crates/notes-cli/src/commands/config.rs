use notes_core::config::{default_config_path, NotesConfig};
use notes_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    let path = default_config_path();
    match command {
        ConfigCommands::Init {
            database_url,
            api_key,
            collection,
        } => {
            let existing = NotesConfig::load_from_path(&path)?;
            let config = apply_init(existing, database_url, api_key, collection);
            config
                .save_to_path(&path)
                .map_err(|error| CliError::Config(error.to_string()))?;
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = NotesConfig::load()?;
            println!("# {}", path.display());
            println!("{}", render_config(&config)?);
        }
    }
    Ok(())
}

/// Merge `config init` flags into the stored config; absent flags keep values.
pub fn apply_init(
    mut config: NotesConfig,
    database_url: Option<String>,
    api_key: Option<String>,
    collection: Option<String>,
) -> NotesConfig {
    if let Some(url) = normalize_text_option(database_url) {
        config.database_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(key) = normalize_text_option(api_key) {
        config.api_key = Some(key);
    }
    if let Some(collection) = normalize_text_option(collection) {
        config.collection = collection;
    }
    config
}

/// Pretty JSON with the API key masked.
pub fn render_config(config: &NotesConfig) -> Result<String, CliError> {
    let mut shown = config.clone();
    shown.api_key = shown.api_key.map(|key| mask_secret(&key));
    Ok(serde_json::to_string_pretty(&shown)?)
}

fn mask_secret(value: &str) -> String {
    let visible = value.chars().take(4).collect::<String>();
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
