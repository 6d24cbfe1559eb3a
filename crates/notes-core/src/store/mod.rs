//! Note storage: the store boundary and its backends.
//!
//! [`NoteStore`] mirrors the handful of calls the app makes on a realtime
//! database reference (push key, set, get, remove, live value events).
//! [`NoteService`] is the cloneable handle the screens and the CLI hold.

mod memory;
mod realtime;
mod sqlite;
mod sse;
mod tree;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::auth::AuthSession;
use crate::config::NotesConfig;
use crate::models::{Note, NoteDraft, NoteId};
use crate::{Error, Result};

pub use memory::MemoryNoteStore;
pub use realtime::{scoped_collection_path, RealtimeDbStore};
pub use sqlite::SqliteNoteStore;
pub use sse::{SseEvent, SseParser};
pub use tree::CollectionTree;

const SUBSCRIPTION_BUFFER: usize = 16;

/// Async key-value operations over the notes collection.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Generate a fresh, unique key for a new child.
    fn push_key(&self) -> NoteId;

    /// Write the full record under `id`, replacing whatever was there.
    async fn set(&self, id: &NoteId, note: &Note) -> Result<()>;

    /// Read one record; the returned note carries `id` as its id.
    async fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// Remove the record under `id`. Removing a missing key is not an error.
    async fn remove(&self, id: &NoteId) -> Result<()>;

    /// One-shot snapshot of the whole collection, ordered by key.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Live snapshots of the collection until the subscription is dropped.
    async fn subscribe(&self) -> Result<NoteSubscription>;
}

/// Delivered to a live subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    /// The full collection after a change.
    Snapshot(Vec<Note>),
    /// The listener was cancelled by the store; no further events follow.
    Cancelled(String),
}

/// Receiving end of a live collection listener.
///
/// Dropping it detaches the listener.
pub struct NoteSubscription {
    receiver: mpsc::Receiver<SubscriptionEvent>,
    task: Option<JoinHandle<()>>,
}

impl NoteSubscription {
    pub(crate) fn spawn<F, Fut>(listener: F) -> Self
    where
        F: FnOnce(mpsc::Sender<SubscriptionEvent>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(listener(sender));
        Self {
            receiver,
            task: Some(task),
        }
    }

    /// Wait for the next event; `None` once the listener has stopped.
    pub async fn next(&mut self) -> Option<SubscriptionEvent> {
        self.receiver.recv().await
    }

    /// Detach the listener.
    pub fn close(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.receiver.close();
    }
}

impl Drop for NoteSubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Thread-safe handle over a [`NoteStore`] backend.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: impl NoteStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// In-process store (primarily for tests).
    pub fn open_in_memory() -> Self {
        Self::new(MemoryNoteStore::new())
    }

    /// Local-only SQLite store at the given path.
    pub fn open_local_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        tracing::info!("Running in local-only mode at {}", db_path.display());
        Ok(Self::new(SqliteNoteStore::open(db_path)?))
    }

    /// Remote realtime database, scoped to the signed-in user when present.
    pub fn open_remote(config: &NotesConfig, session: Option<&AuthSession>) -> Result<Self> {
        let database_url = config.database_url.as_deref().ok_or_else(|| {
            Error::InvalidInput("database_url is not configured".to_string())
        })?;
        let path = scoped_collection_path(
            &config.collection,
            session.map(|session| session.user.id.as_str()),
        );
        let token = session.map(|session| session.id_token.clone());
        tracing::info!("Using realtime database {database_url} at /{path}");
        Ok(Self::new(RealtimeDbStore::new(database_url, path, token)?))
    }

    /// Create a note under a fresh push key.
    pub async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        if !draft.is_complete() {
            return Err(Error::InvalidInput(
                "subject, type, and content are required".to_string(),
            ));
        }
        let id = self.store.push_key();
        let note = Note::from_draft(id.clone(), draft);
        self.store.set(&id, &note).await?;
        tracing::debug!("Created note {id}");
        Ok(note)
    }

    /// Overwrite the note under `id` with the draft's fields.
    pub async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note> {
        let note = Note::from_draft(id.clone(), draft);
        self.store.set(id, &note).await?;
        tracing::debug!("Updated note {id}");
        Ok(note)
    }

    pub async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        self.store.get(id).await
    }

    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        self.store.remove(id).await?;
        tracing::debug!("Deleted note {id}");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Note>> {
        self.store.list().await
    }

    pub async fn subscribe(&self) -> Result<NoteSubscription> {
        self.store.subscribe().await
    }
}
