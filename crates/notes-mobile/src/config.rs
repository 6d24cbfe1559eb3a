//! Runtime configuration handling for mobile.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::path::{Path, PathBuf};

use notes_core::config::{NotesConfig, ENV_API_KEY, ENV_COLLECTION, ENV_DATABASE_URL};

use crate::paths::notes_data_dir;

const RUNTIME_CONFIG_FILE: &str = "mobile-config.json";

pub fn default_runtime_config_path() -> PathBuf {
    notes_data_dir().join(RUNTIME_CONFIG_FILE)
}

pub fn load_runtime_config() -> NotesConfig {
    load_runtime_config_from(
        &default_runtime_config_path(),
        std::env::var(ENV_DATABASE_URL).ok(),
        std::env::var(ENV_API_KEY).ok(),
        std::env::var(ENV_COLLECTION).ok(),
    )
}

/// The app still starts on a broken config file, in local-only mode.
pub fn load_runtime_config_from(
    path: &Path,
    database_url: Option<String>,
    api_key: Option<String>,
    collection: Option<String>,
) -> NotesConfig {
    let mut config = match NotesConfig::load_from_path(path) {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!("Ignoring mobile runtime config: {}", error);
            NotesConfig::default()
        }
    };
    config.apply_overrides(database_url, api_key, collection);

    if let Err(error) = config.validate() {
        tracing::warn!("Invalid mobile runtime config, using defaults: {}", error);
        return NotesConfig::default();
    }
    config
}
