//! Anonymous sign-in with the session kept in Android secure storage.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use notes_core::auth::{AnonymousAuthClient, AuthResult, SessionPersistence};
pub use notes_core::auth::{AuthError, AuthSession};
use notes_core::config::NotesConfig;

use crate::secret_store::SessionSecret;

#[derive(Debug, Clone)]
struct SessionStore {
    secret: SessionSecret,
}

impl SessionStore {
    fn for_config(config: &NotesConfig) -> Self {
        Self {
            secret: SessionSecret::for_database(config.database_url.as_deref()),
        }
    }
}

impl SessionPersistence for SessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let raw = self.secret.load().map_err(AuthError::SecureStorage)?;
        Ok(raw.as_deref().map(serde_json::from_str).transpose()?)
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let serialized = serde_json::to_string(session)?;
        self.secret
            .store(&serialized)
            .map_err(AuthError::SecureStorage)
    }

    fn clear_session(&self) -> AuthResult<()> {
        self.secret.forget().map_err(AuthError::SecureStorage)
    }
}

#[derive(Clone)]
pub struct MobileAuthService {
    inner: AnonymousAuthClient<SessionStore>,
}

impl MobileAuthService {
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

    /// Reuse the stored session, refreshing or signing in as needed.
    pub async fn ensure_signed_in(&self) -> AuthResult<AuthSession> {
        self.inner.ensure_signed_in().await
    }
}

#[cfg(test)]
mod tests {
    use notes_core::auth::AuthUser;
    use notes_core::util::unix_timestamp_now;

    use super::*;

    fn config(database_url: &str) -> NotesConfig {
        NotesConfig {
            database_url: Some(database_url.to_string()),
            api_key: Some("key".to_string()),
            ..NotesConfig::default()
        }
    }

    #[test]
    fn service_requires_api_key() {
        assert!(MobileAuthService::from_config(&NotesConfig::default())
            .unwrap()
            .is_none());
        assert!(MobileAuthService::from_config(&config("https://a.example.com"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn session_store_roundtrip() {
        let store = SessionStore::for_config(&config("https://mobile.example.com"));
        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());

        let session = AuthSession {
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: unix_timestamp_now() + 3600,
            user: AuthUser {
                id: "anon-7".to_string(),
                is_anonymous: true,
            },
        };
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn unexpired_session_is_reused_without_network() {
        let config = config("http://127.0.0.1:9");
        let store = SessionStore::for_config(&config);
        let session = AuthSession {
            id_token: "cached".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: unix_timestamp_now() + 3600,
            user: AuthUser {
                id: "anon-cached".to_string(),
                is_anonymous: true,
            },
        };
        store.save_session(&session).unwrap();

        let service = MobileAuthService::from_config(&config).unwrap().unwrap();
        assert_eq!(service.ensure_signed_in().await.unwrap().user.id, "anon-cached");
        store.clear_session().unwrap();
    }
}
