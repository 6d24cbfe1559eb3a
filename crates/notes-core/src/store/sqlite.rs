//! Local-only `SQLite` backend

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;

use super::{NoteStore, NoteSubscription, SubscriptionEvent};
use crate::models::{Note, NoteId, PushIdGenerator};
use crate::Result;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Notes kept in a single `SQLite` table keyed by push key.
#[derive(Clone)]
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
    snapshots: Arc<watch::Sender<u64>>,
    keys: Arc<Mutex<PushIdGenerator>>,
}

impl SqliteNoteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrate(&conn)?;
        let (snapshots, _) = watch::channel(0);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            snapshots: Arc::new(snapshots),
            keys: Arc::new(Mutex::new(PushIdGenerator::new())),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.snapshots.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn read_all(&self) -> Result<Vec<Note>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, subject, type, content FROM notes ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, note)| Ok(note.with_id(id.parse()?)))
            .collect()
    }
}

/// Parse a `(key, note)` pair from a database row
fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, Note)> {
    Ok((
        row.get(0)?,
        Note {
            id: None,
            subject: row.get(1)?,
            note_type: row.get(2)?,
            content: row.get(3)?,
        },
    ))
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
    )?;
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    if version < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY NOT NULL,
                subject TEXT,
                type TEXT,
                content TEXT
            );
            INSERT INTO schema_version (version) VALUES (1);",
        )?;
        tracing::debug!("Migrated local notes schema to v{CURRENT_VERSION}");
    }
    Ok(())
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    fn push_key(&self) -> NoteId {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()
    }

    async fn set(&self, id: &NoteId, note: &Note) -> Result<()> {
        self.conn().execute(
            "INSERT INTO notes (id, subject, type, content) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                subject = excluded.subject,
                type = excluded.type,
                content = excluded.content",
            params![id.as_str(), note.subject, note.note_type, note.content],
        )?;
        self.notify();
        Ok(())
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let row = self
            .conn()
            .query_row(
                "SELECT id, subject, type, content FROM notes WHERE id = ?1",
                params![id.as_str()],
                parse_row,
            )
            .optional()?;
        Ok(row.map(|(_, note)| note.with_id(id.clone())))
    }

    async fn remove(&self, id: &NoteId) -> Result<()> {
        let removed = self
            .conn()
            .execute("DELETE FROM notes WHERE id = ?1", params![id.as_str()])?;
        if removed > 0 {
            self.notify();
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Note>> {
        self.read_all()
    }

    async fn subscribe(&self) -> Result<NoteSubscription> {
        let mut receiver = self.snapshots.subscribe();
        let store = self.clone();
        Ok(NoteSubscription::spawn(|sender| async move {
            loop {
                let _ = receiver.borrow_and_update();
                let event = match store.read_all() {
                    Ok(notes) => SubscriptionEvent::Snapshot(notes),
                    Err(error) => {
                        tracing::warn!("Local note listener failed: {error}");
                        let _ = sender.send(SubscriptionEvent::Cancelled(error.to_string())).await;
                        return;
                    }
                };
                if sender.send(event).await.is_err() || receiver.changed().await.is_err() {
                    return;
                }
            }
        }))
    }
}
