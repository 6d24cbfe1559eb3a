//! Client configuration shared by the CLI and the mobile shell.
//!
//! Values come from a JSON file in the platform config directory and can be
//! overridden with `NOTES_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_IDENTITY_URL, DEFAULT_SECURE_TOKEN_URL};
use crate::sensors::{AmbientThresholds, ShakeSettings};
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const CONFIG_DIR_NAME: &str = "notes";
const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_COLLECTION: &str = "notes";

pub const ENV_DATABASE_URL: &str = "NOTES_DATABASE_URL";
pub const ENV_API_KEY: &str = "NOTES_API_KEY";
pub const ENV_COLLECTION: &str = "NOTES_COLLECTION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Realtime database root, e.g. `https://<project>-default-rtdb.firebaseio.com`
    #[serde(default)]
    pub database_url: Option<String>,
    /// Public web API key used for anonymous sign-in
    #[serde(default)]
    pub api_key: Option<String>,
    /// Name of the notes collection under the database root
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub identity_url: Option<String>,
    #[serde(default)]
    pub secure_token_url: Option<String>,
    #[serde(default)]
    pub shake: ShakeSettings,
    #[serde(default)]
    pub ambient: AmbientThresholds,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            api_key: None,
            collection: default_collection(),
            identity_url: None,
            secure_token_url: None,
            shake: ShakeSettings::default(),
            ambient: AmbientThresholds::default(),
        }
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl NotesConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&default_config_path())?;
        config.apply_overrides(
            std::env::var(ENV_DATABASE_URL).ok(),
            std::env::var(ENV_API_KEY).ok(),
            std::env::var(ENV_COLLECTION).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::InvalidInput(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        normalized.validate()?;
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Environment values win over file values when present.
    pub fn apply_overrides(
        &mut self,
        database_url: Option<String>,
        api_key: Option<String>,
        collection: Option<String>,
    ) {
        if let Some(url) = normalize_text_option(database_url) {
            self.database_url = Some(url);
        }
        if let Some(key) = normalize_text_option(api_key) {
            self.api_key = Some(key);
        }
        if let Some(collection) = normalize_text_option(collection) {
            self.collection = collection;
        }
        self.normalize();
    }

    /// Whether the remote database can be used.
    pub const fn has_remote(&self) -> bool {
        self.database_url.is_some()
    }

    pub fn identity_url(&self) -> &str {
        self.identity_url.as_deref().unwrap_or(DEFAULT_IDENTITY_URL)
    }

    pub fn secure_token_url(&self) -> &str {
        self.secure_token_url
            .as_deref()
            .unwrap_or(DEFAULT_SECURE_TOKEN_URL)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("database_url", &self.database_url),
            ("identity_url", &self.identity_url),
            ("secure_token_url", &self.secure_token_url),
        ] {
            if let Some(url) = value {
                if !is_http_url(url) {
                    return Err(Error::InvalidInput(format!(
                        "config field '{field}' must include http:// or https://"
                    )));
                }
            }
        }
        if self.collection.contains(['.', '$', '#', '[', ']']) {
            return Err(Error::InvalidInput(format!(
                "collection '{}' contains characters not allowed in a path",
                self.collection
            )));
        }
        self.shake.validate()?;
        self.ambient.validate()
    }

    fn normalize(&mut self) {
        self.database_url = normalize_url(self.database_url.take());
        self.api_key = normalize_text_option(self.api_key.take());
        self.identity_url = normalize_url(self.identity_url.take());
        self.secure_token_url = normalize_url(self.secure_token_url.take());
        let collection = self.collection.trim().trim_matches('/');
        self.collection = if collection.is_empty() {
            default_collection()
        } else {
            collection.to_string()
        };
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Default location of the local-only SQLite store.
pub fn default_local_db_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("notes.db")
}

fn normalize_url(value: Option<String>) -> Option<String> {
    normalize_text_option(value).map(|url| url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_use_notes_collection_without_remote() {
        let config = NotesConfig::default();
        assert_eq!(config.collection, "notes");
        assert!(!config.has_remote());
        assert_eq!(config.identity_url(), DEFAULT_IDENTITY_URL);
    }

    #[test]
    fn overrides_trim_and_replace_file_values() {
        let mut config = NotesConfig {
            database_url: Some("https://old.firebaseio.com".to_string()),
            ..NotesConfig::default()
        };
        config.apply_overrides(
            Some(" https://new-default-rtdb.firebaseio.com/ ".to_string()),
            Some("  ".to_string()),
            Some("/shared-notes/".to_string()),
        );

        assert_eq!(
            config.database_url.as_deref(),
            Some("https://new-default-rtdb.firebaseio.com")
        );
        assert_eq!(config.api_key, None);
        assert_eq!(config.collection, "shared-notes");
    }

    #[test]
    fn validate_rejects_non_http_urls_and_bad_collection() {
        let config = NotesConfig {
            database_url: Some("firebaseio.com".to_string()),
            ..NotesConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NotesConfig {
            collection: "notes.v2".to_string(),
            ..NotesConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = NotesConfig {
            database_url: Some("https://demo.firebaseio.com/".to_string()),
            api_key: Some("key".to_string()),
            ..NotesConfig::default()
        };

        config.save_to_path(&path).unwrap();
        let loaded = NotesConfig::load_from_path(&path).unwrap();
        assert_eq!(
            loaded.database_url.as_deref(),
            Some("https://demo.firebaseio.com")
        );
        assert_eq!(loaded.api_key.as_deref(), Some("key"));
        assert_eq!(loaded.shake, ShakeSettings::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = NotesConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, NotesConfig::default());
    }

    #[test]
    fn partial_file_fills_sensor_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"shake": {"threshold_g": 2.5}}"#).unwrap();

        let loaded = NotesConfig::load_from_path(&path).unwrap();
        assert!((loaded.shake.threshold_g - 2.5).abs() < f32::EPSILON);
        assert_eq!(loaded.shake.cooldown_ms, 1000);
        assert_eq!(loaded.ambient, AmbientThresholds::default());
    }
}
