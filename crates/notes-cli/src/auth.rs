//! CLI anonymous auth/session helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use notes_core::auth::{AnonymousAuthClient, AuthResult, AuthUser, SessionPersistence};
pub use notes_core::auth::{AuthError, AuthSession};
use notes_core::config::NotesConfig;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "notes-cli";

#[derive(Clone)]
struct SessionStore {
    username: String,
}

impl SessionStore {
    /// One stored identity per database URL.
    fn for_config(config: &NotesConfig) -> Self {
        let scope = config.database_url.as_deref().unwrap_or("default");
        Self {
            username: format!("anonymous_session:{scope}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

#[derive(Clone)]
pub struct AnonymousAuthService {
    inner: AnonymousAuthClient<SessionStore>,
}

impl AnonymousAuthService {
    /// `None` when no API key is configured.
    pub fn from_config(config: &NotesConfig) -> AuthResult<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        Ok(Some(Self {
            inner: AnonymousAuthClient::with_endpoints(
                api_key,
                config.identity_url(),
                config.secure_token_url(),
                SessionStore::for_config(config),
            )?,
        }))
    }

    pub async fn ensure_signed_in(&self) -> AuthResult<AuthSession> {
        self.inner.ensure_signed_in().await
    }

    pub async fn current_user(&self) -> AuthResult<Option<AuthUser>> {
        self.inner.current_user().await
    }

    pub fn sign_out(&self) -> AuthResult<()> {
        self.inner.sign_out()
    }
}

pub fn load_stored_session(config: &NotesConfig) -> AuthResult<Option<AuthSession>> {
    SessionStore::for_config(config).load_session()
}

fn clear_stored_session(config: &NotesConfig) -> AuthResult<()> {
    SessionStore::for_config(config).clear_session()
}

/// Forget the stored identity, through the auth client when one is configured.
pub fn sign_out(config: &NotesConfig) -> AuthResult<()> {
    match AnonymousAuthService::from_config(config)? {
        Some(service) => service.sign_out(),
        None => clear_stored_session(config),
    }
}
