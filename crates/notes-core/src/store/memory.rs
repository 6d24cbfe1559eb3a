use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{NoteStore, NoteSubscription, SubscriptionEvent};
use crate::models::{Note, NoteId, PushIdGenerator};
use crate::Result;

/// Process-local store with the same observable behaviour as the remote one.
#[derive(Clone)]
pub struct MemoryNoteStore {
    notes: Arc<Mutex<BTreeMap<NoteId, Note>>>,
    snapshots: Arc<watch::Sender<Vec<Note>>>,
    keys: Arc<Mutex<PushIdGenerator>>,
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNoteStore {
    #[must_use]
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            notes: Arc::new(Mutex::new(BTreeMap::new())),
            snapshots: Arc::new(snapshots),
            keys: Arc::new(Mutex::new(PushIdGenerator::new())),
        }
    }

    fn notes(&self) -> MutexGuard<'_, BTreeMap<NoteId, Note>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, notes: &BTreeMap<NoteId, Note>) {
        self.snapshots.send_replace(notes.values().cloned().collect());
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    fn push_key(&self) -> NoteId {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()
    }

    async fn set(&self, id: &NoteId, note: &Note) -> Result<()> {
        let mut notes = self.notes();
        notes.insert(id.clone(), note.clone().with_id(id.clone()));
        self.publish(&notes);
        Ok(())
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        Ok(self.notes().get(id).cloned())
    }

    async fn remove(&self, id: &NoteId) -> Result<()> {
        let mut notes = self.notes();
        if notes.remove(id).is_some() {
            self.publish(&notes);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self.notes().values().cloned().collect())
    }

    async fn subscribe(&self) -> Result<NoteSubscription> {
        let mut receiver = self.snapshots.subscribe();
        Ok(NoteSubscription::spawn(|sender| async move {
            loop {
                let snapshot = receiver.borrow_and_update().clone();
                if sender
                    .send(SubscriptionEvent::Snapshot(snapshot))
                    .await
                    .is_err()
                {
                    return;
                }
                if receiver.changed().await.is_err() {
                    return;
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteDraft;
    use pretty_assertions::assert_eq;

    fn note(id: &NoteId, subject: &str) -> Note {
        Note::from_draft(id.clone(), &NoteDraft::new(subject, "memo", "body"))
    }

    #[tokio::test]
    async fn list_is_ordered_by_push_key() {
        let store = MemoryNoteStore::new();
        let first = store.push_key();
        let second = store.push_key();

        store.set(&second, &note(&second, "second")).await.unwrap();
        store.set(&first, &note(&first, "first")).await.unwrap();

        let subjects = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.subject.unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(subjects, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn set_stamps_the_key_as_id() {
        let store = MemoryNoteStore::new();
        let key = store.push_key();
        store.set(&key, &Note::default()).await.unwrap();

        let stored = store.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(key));
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let store = MemoryNoteStore::new();
        let key = store.push_key();
        store.remove(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn subscription_sees_current_state_then_changes() {
        let store = MemoryNoteStore::new();
        let key = store.push_key();
        store.set(&key, &note(&key, "existing")).await.unwrap();

        let mut subscription = store.subscribe().await.unwrap();
        assert_eq!(
            subscription.next().await,
            Some(SubscriptionEvent::Snapshot(vec![note(&key, "existing")]))
        );

        store.remove(&key).await.unwrap();
        assert_eq!(
            subscription.next().await,
            Some(SubscriptionEvent::Snapshot(Vec::new()))
        );
    }
}
