//! Realtime database backend over its REST and streaming endpoints.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tokio::sync::mpsc;

use super::sse::{SseParser, StreamMessage};
use super::tree::{decode_child, CollectionTree};
use super::{NoteStore, NoteSubscription, SubscriptionEvent};
use crate::auth::parse_api_error;
use crate::models::{Note, NoteId, PushIdGenerator};
use crate::util::is_http_url;
use crate::{Error, Result};

/// Path of the notes collection, nested under the user id when signed in.
pub fn scoped_collection_path(collection: &str, uid: Option<&str>) -> String {
    let collection = collection.trim_matches('/');
    match uid.map(str::trim).filter(|uid| !uid.is_empty()) {
        Some(uid) => format!("{collection}/{uid}"),
        None => collection.to_string(),
    }
}

pub struct RealtimeDbStore {
    client: Client,
    database_url: String,
    collection_path: String,
    auth_token: Option<String>,
    keys: Mutex<PushIdGenerator>,
}

impl RealtimeDbStore {
    pub fn new(
        database_url: &str,
        collection_path: impl Into<String>,
        auth_token: Option<String>,
    ) -> Result<Self> {
        let database_url = database_url.trim().trim_end_matches('/');
        if !is_http_url(database_url) {
            return Err(Error::InvalidInput(format!(
                "database URL '{database_url}' must include http:// or https://"
            )));
        }

        Ok(Self {
            client: Client::new(),
            database_url: database_url.to_string(),
            collection_path: collection_path.into().trim_matches('/').to_string(),
            auth_token,
            keys: Mutex::new(PushIdGenerator::new()),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, self.collection_path)
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!(
            "{}/{}/{}.json",
            self.database_url,
            self.collection_path,
            urlencoding::encode(id.as_str())
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }
}

#[async_trait]
impl NoteStore for RealtimeDbStore {
    fn push_key(&self) -> NoteId {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()
    }

    async fn set(&self, id: &NoteId, note: &Note) -> Result<()> {
        let request = self.authorized(self.client.put(self.note_url(id)).json(note));
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let request = self.authorized(self.client.get(self.note_url(id)));
        let value = ensure_success(request.send().await?)
            .await?
            .json::<Value>()
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(decode_child(id.as_str(), &value))
    }

    async fn remove(&self, id: &NoteId) -> Result<()> {
        let request = self.authorized(self.client.delete(self.note_url(id)));
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Note>> {
        let request = self.authorized(self.client.get(self.collection_url()));
        let value = ensure_success(request.send().await?)
            .await?
            .json::<Value>()
            .await?;
        Ok(CollectionTree::from_value(value).notes())
    }

    async fn subscribe(&self) -> Result<NoteSubscription> {
        let request = self.authorized(
            self.client
                .get(self.collection_url())
                .header(ACCEPT, "text/event-stream"),
        );
        let response = ensure_success(request.send().await?).await?;
        tracing::debug!("Listening on /{}", self.collection_path);

        Ok(NoteSubscription::spawn(|sender| async move {
            let reason = match forward_events(response, &sender).await {
                Ok(Some(reason)) => reason,
                Ok(None) => return,
                Err(error) => error.to_string(),
            };
            tracing::warn!("Note listener cancelled: {reason}");
            let _ = sender.send(SubscriptionEvent::Cancelled(reason)).await;
        }))
    }
}

/// Apply stream events to a local mirror and forward a snapshot per change.
///
/// Returns the cancellation reason, or `None` when the receiver went away.
async fn forward_events(
    response: Response,
    sender: &mpsc::Sender<SubscriptionEvent>,
) -> Result<Option<String>> {
    let mut stream = response.bytes_stream();
    let mut parser = SseParser::new();
    let mut tree = CollectionTree::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for event in parser.push(&chunk) {
            match StreamMessage::parse(&event)? {
                Some(StreamMessage::Put { path, data }) => tree.put(&path, data),
                Some(StreamMessage::Patch { path, data }) => tree.patch(&path, data),
                Some(StreamMessage::KeepAlive) | None => continue,
                Some(StreamMessage::Cancel(reason)) => return Ok(Some(reason)),
                Some(StreamMessage::AuthRevoked) => {
                    return Ok(Some("auth token revoked".to_string()));
                }
            }
            if sender
                .send(SubscriptionEvent::Snapshot(tree.notes()))
                .await
                .is_err()
            {
                return Ok(None);
            }
        }
    }

    Err(Error::Stream("event stream closed by server".to_string()))
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api(parse_api_error(status, &body)))
}
