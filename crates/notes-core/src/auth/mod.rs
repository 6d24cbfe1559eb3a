//! Shared anonymous auth client logic (Identity Toolkit REST API).

use std::fmt;
use std::sync::{Arc, Mutex};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{compact_text, is_http_url, normalize_text_option, unix_timestamp_now};

const EXPIRY_SKEW_SECONDS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

const fn default_anonymous() -> bool {
    true
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Process-local session persistence, used by tests and local-only runs.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AnonymousAuthClient<S: SessionPersistence> {
    identity_url: String,
    secure_token_url: String,
    api_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> AnonymousAuthClient<S> {
    pub fn new(api_key: impl Into<String>, store: S) -> AuthResult<Self> {
        Self::with_endpoints(
            api_key,
            DEFAULT_IDENTITY_URL,
            DEFAULT_SECURE_TOKEN_URL,
            store,
        )
    }

    /// Build a client against explicit endpoints (e.g. the local emulator).
    pub fn with_endpoints(
        api_key: impl Into<String>,
        identity_url: impl AsRef<str>,
        secure_token_url: impl AsRef<str>,
        store: S,
    ) -> AuthResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AuthError::InvalidConfiguration("API key must not be empty"));
        }

        Ok(Self {
            identity_url: normalize_endpoint_url(identity_url.as_ref())?,
            secure_token_url: normalize_endpoint_url(secure_token_url.as_ref())?,
            api_key,
            client: Client::builder().build()?,
            store,
        })
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Create a fresh anonymous identity and persist its session.
    pub async fn sign_in_anonymously(&self) -> AuthResult<AuthSession> {
        let request = self
            .client
            .post(format!("{}/v1/accounts:signUp", self.identity_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({ "returnSecureToken": true }));

        let response: SignUpResponse = self.send_auth_request(request).await?;
        let session = response.into_session()?;
        tracing::info!("Signed in anonymously as {}", session.user.id);

        self.store.save_session(&session)?;
        Ok(session)
    }

    /// Restore the persisted identity, or sign in anonymously when there is none.
    pub async fn ensure_signed_in(&self) -> AuthResult<AuthSession> {
        if let Some(session) = self.restore_session().await? {
            return Ok(session);
        }
        self.sign_in_anonymously().await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let request = self
            .client
            .post(format!("{}/v1/token", self.secure_token_url))
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ]);

        let response: RefreshResponse = self.send_auth_request(request).await?;
        let session = response.into_session()?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    /// The signed-in user, if a usable session is persisted.
    pub async fn current_user(&self) -> AuthResult<Option<AuthUser>> {
        Ok(self.restore_session().await?.map(|session| session.user))
    }

    /// Forget the anonymous identity on this device.
    pub fn sign_out(&self) -> AuthResult<()> {
        self.store.clear_session()
    }

    async fn send_auth_request<T>(&self, request: RequestBuilder) -> AuthResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }
}

pub fn normalize_endpoint_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Auth endpoint URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "Auth endpoint URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    local_id: Option<String>,
}

impl SignUpResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        build_session(
            self.id_token,
            self.refresh_token,
            self.expires_in.as_deref(),
            self.local_id,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    user_id: Option<String>,
}

impl RefreshResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        build_session(
            self.id_token,
            self.refresh_token,
            self.expires_in.as_deref(),
            self.user_id,
        )
    }
}

fn build_session(
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<&str>,
    user_id: Option<String>,
) -> AuthResult<AuthSession> {
    let expires_in = match expires_in {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthError::Api(format!("Invalid expiresIn value '{raw}'")))?,
        None => DEFAULT_TOKEN_LIFETIME_SECONDS,
    };

    match (
        normalize_text_option(id_token),
        normalize_text_option(refresh_token),
        normalize_text_option(user_id),
    ) {
        (Some(id_token), Some(refresh_token), Some(user_id)) => Ok(AuthSession {
            id_token,
            refresh_token,
            expires_at: unix_timestamp_now().saturating_add(expires_in),
            user: AuthUser {
                id: user_id,
                is_anonymous: true,
            },
        }),
        _ => Err(AuthError::Api(
            "Auth response did not include enough session fields".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: Option<String> },
    Plain(String),
}

pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorEnvelope { error: Some(error) }) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = match error {
            ErrorBody::Detailed { message } => message,
            ErrorBody::Plain(message) => Some(message),
        };
        if let Some(message) = message {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let compact = compact_text(body);
    if compact.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> AuthSession {
        AuthSession {
            id_token: "secret-id-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at,
            user: AuthUser {
                id: "anon-user".to_string(),
                is_anonymous: true,
            },
        }
    }

    #[test]
    fn normalize_endpoint_url_strips_trailing_slash() {
        let normalized =
            normalize_endpoint_url("http://localhost:9099/identitytoolkit.googleapis.com/")
                .unwrap();
        assert_eq!(
            normalized,
            "http://localhost:9099/identitytoolkit.googleapis.com"
        );
        assert!(normalize_endpoint_url("identitytoolkit.googleapis.com").is_err());
        assert!(normalize_endpoint_url("  ").is_err());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let error = AnonymousAuthClient::new("  ", MemorySessionStore::default())
            .err()
            .unwrap();
        assert!(matches!(error, AuthError::InvalidConfiguration(_)));
    }

    #[test]
    fn sign_up_response_builds_session() {
        let response: SignUpResponse = serde_json::from_str(
            r#"{
                "kind": "identitytoolkit#SignupNewUserResponse",
                "idToken": "id",
                "refreshToken": "refresh",
                "expiresIn": "3600",
                "localId": "uid-1"
            }"#,
        )
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.user.id, "uid-1");
        assert!(session.user.is_anonymous);
        assert!(!session.is_expired());
    }

    #[test]
    fn refresh_response_uses_snake_case_fields() {
        let response: RefreshResponse = serde_json::from_str(
            r#"{
                "expires_in": "3600",
                "token_type": "Bearer",
                "refresh_token": "refresh-2",
                "id_token": "id-2",
                "user_id": "uid-1",
                "project_id": "123"
            }"#,
        )
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.refresh_token, "refresh-2");
        assert_eq!(session.user.id, "uid-1");
    }

    #[test]
    fn incomplete_response_is_an_error() {
        let response: SignUpResponse = serde_json::from_str(r#"{"idToken": "id"}"#).unwrap();
        assert!(matches!(response.into_session(), Err(AuthError::Api(_))));
    }

    #[test]
    fn session_expiry_honours_skew() {
        assert!(session(unix_timestamp_now() + 30).is_expired());
        assert!(!session(unix_timestamp_now() + 600).is_expired());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let rendered = format!("{:?}", session(1_700_000_000));
        assert!(!rendered.contains("secret-id-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        let body = r#"{"error":{"code":400,"message":"ADMIN_ONLY_OPERATION"}}"#;
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, body),
            "ADMIN_ONLY_OPERATION (400)"
        );
        assert_eq!(
            parse_api_error(StatusCode::UNAUTHORIZED, r#"{"error":"Permission denied"}"#),
            "Permission denied (401)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
        let html = format!("<html>{}</html>", "x".repeat(400));
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, &html).len(),
            180 + " (502)".len()
        );
    }

    #[tokio::test]
    async fn restore_returns_unexpired_session_without_network() {
        let store = MemorySessionStore::default();
        store.save_session(&session(unix_timestamp_now() + 600)).unwrap();
        let client = AnonymousAuthClient::new("key", store).unwrap();

        let restored = client.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.user.id, "anon-user");
        assert_eq!(
            client.current_user().await.unwrap().map(|user| user.id),
            Some("anon-user".to_string())
        );
    }

    #[tokio::test]
    async fn failed_refresh_clears_stored_session() {
        let store = MemorySessionStore::default();
        store.save_session(&session(0)).unwrap();
        // Nothing listens on port 9 locally, so the refresh fails fast.
        let client = AnonymousAuthClient::with_endpoints(
            "key",
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            store.clone(),
        )
        .unwrap();

        assert!(client.restore_session().await.unwrap().is_none());
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn sign_out_clears_session() {
        let store = MemorySessionStore::default();
        store.save_session(&session(unix_timestamp_now() + 600)).unwrap();
        let client = AnonymousAuthClient::new("key", store.clone()).unwrap();
        client.sign_out().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
