//! Session secrets in the platform credential store.
//!
//! On Android entries live in the native keystore; host builds (and tests)
//! install the in-process mock store instead.

use std::sync::{Arc, OnceLock};

use keyring_core::{CredentialStore, Entry, Error as KeyringError};

const SERVICE: &str = "notes-mobile";

static DEFAULT_STORE: OnceLock<Result<(), String>> = OnceLock::new();

/// The anonymous session stored for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSecret {
    name: String,
}

impl SessionSecret {
    pub fn for_database(database_url: Option<&str>) -> Self {
        Self {
            name: format!("anonymous_session:{}", database_url.unwrap_or("default")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blank stored values read as absent.
    pub fn load(&self) -> Result<Option<String>, String> {
        match self.entry()?.get_password() {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(error) => Err(describe(error)),
        }
    }

    pub fn store(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err(format!("refusing to store an empty secret for {}", self.name));
        }
        self.entry()?.set_password(value).map_err(describe)
    }

    /// Removing a missing entry is not an error.
    pub fn forget(&self) -> Result<(), String> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(error) => Err(describe(error)),
        }
    }

    fn entry(&self) -> Result<Entry, String> {
        DEFAULT_STORE.get_or_init(install_default_store).clone()?;
        Entry::new(SERVICE, &self.name).map_err(describe)
    }
}

fn install_default_store() -> Result<(), String> {
    #[cfg(target_os = "android")]
    let store: Arc<CredentialStore> = android_native_keyring_store::Store::new()
        .map_err(|error| format!("Android keystore unavailable: {error}"))?;
    #[cfg(not(target_os = "android"))]
    let store: Arc<CredentialStore> = keyring_core::mock::Store::new()
        .map_err(|error| format!("mock credential store unavailable: {error}"))?;

    keyring_core::set_default_store(store);
    Ok(())
}

fn describe(error: KeyringError) -> String {
    match error {
        KeyringError::NoDefaultStore => "credential store is not initialized".to_string(),
        other => format!("credential store error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn secrets_are_named_per_database() {
        assert_eq!(
            SessionSecret::for_database(None).name(),
            "anonymous_session:default"
        );
        assert_eq!(
            SessionSecret::for_database(Some("https://demo.firebaseio.com")).name(),
            "anonymous_session:https://demo.firebaseio.com"
        );
    }

    #[test]
    fn stored_value_is_loaded_until_forgotten() {
        let secret = SessionSecret::for_database(Some("https://store.example.com"));
        secret.forget().unwrap();
        assert_eq!(secret.load().unwrap(), None);

        secret.store(r#"{"token":"t"}"#).unwrap();
        assert_eq!(secret.load().unwrap().as_deref(), Some(r#"{"token":"t"}"#));

        secret.forget().unwrap();
        secret.forget().unwrap();
        assert_eq!(secret.load().unwrap(), None);
    }

    #[test]
    fn blank_values_are_refused() {
        let secret = SessionSecret::for_database(Some("https://blank.example.com"));
        assert!(secret.store("  ").unwrap_err().contains("empty secret"));
    }
}
