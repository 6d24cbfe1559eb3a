//! Opening the note store the mobile screens talk to.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::path::{Path, PathBuf};

use notes_core::config::NotesConfig;
use notes_core::store::NoteService;
use notes_core::Result;

use crate::auth::MobileAuthService;
use crate::paths::notes_data_dir;

/// Which backend the screens are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// Realtime database; `user_id` is set when signed in anonymously.
    Remote { user_id: Option<String> },
    /// On-device SQLite, used when no database URL is configured.
    Local,
}

impl StoreMode {
    pub fn describe(&self) -> String {
        match self {
            Self::Remote {
                user_id: Some(user_id),
            } => format!("Connected as {user_id}"),
            Self::Remote { user_id: None } => "Connected (no sign-in)".to_string(),
            Self::Local => "Local-only mode".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MobileNoteStore {
    pub service: NoteService,
    pub mode: StoreMode,
}

pub fn default_db_path() -> PathBuf {
    notes_data_dir().join("notes.db")
}

impl MobileNoteStore {
    pub async fn open(config: &NotesConfig) -> Result<Self> {
        Self::open_with_local_path(config, &default_db_path()).await
    }

    /// Sign in anonymously and bind to the realtime database, or fall back to
    /// the SQLite file at `db_path` when no database is configured.
    pub async fn open_with_local_path(config: &NotesConfig, db_path: &Path) -> Result<Self> {
        if !config.has_remote() {
            return Ok(Self {
                service: NoteService::open_local_path(db_path)?,
                mode: StoreMode::Local,
            });
        }

        let session = match MobileAuthService::from_config(config)? {
            Some(auth) => Some(auth.ensure_signed_in().await?),
            None => {
                tracing::warn!("No API key configured; using the unscoped collection");
                None
            }
        };
        if let Some(session) = &session {
            tracing::info!("Signed in anonymously as {}", session.user.id);
        }

        Ok(Self {
            service: NoteService::open_remote(config, session.as_ref())?,
            mode: StoreMode::Remote {
                user_id: session.map(|session| session.user.id),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use notes_core::NoteDraft;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn without_database_url_opens_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let store = MobileNoteStore::open_with_local_path(&NotesConfig::default(), &path)
            .await
            .unwrap();

        assert_eq!(store.mode, StoreMode::Local);
        store
            .service
            .create(&NoteDraft::new("Geo", "map", "rivers"))
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(store.service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn without_api_key_binds_unscoped_remote() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotesConfig {
            database_url: Some("https://demo.firebaseio.com".to_string()),
            ..NotesConfig::default()
        };
        let store = MobileNoteStore::open_with_local_path(&config, &dir.path().join("notes.db"))
            .await
            .unwrap();
        assert_eq!(store.mode, StoreMode::Remote { user_id: None });
    }

    #[test]
    fn mode_descriptions() {
        assert_eq!(StoreMode::Local.describe(), "Local-only mode");
        assert_eq!(
            StoreMode::Remote {
                user_id: Some("anon-1".to_string())
            }
            .describe(),
            "Connected as anon-1"
        );
    }
}
