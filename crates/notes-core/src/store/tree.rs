//! In-memory JSON mirror of a collection, updated by stream events.

use serde_json::{Map, Value};

use crate::models::{Note, NoteId};

/// JSON tree rooted at the collection reference.
///
/// Follows the realtime database rules: writing `null` removes a node and
/// objects left without children disappear as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionTree {
    root: Value,
}

impl CollectionTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { root: Value::Null }
    }

    #[must_use]
    pub fn from_value(root: Value) -> Self {
        let mut tree = Self::new();
        tree.put("/", root);
        tree
    }

    /// Replace the node at `path` with `data`.
    pub fn put(&mut self, path: &str, data: Value) {
        let segments = split_path(path);
        set_at(&mut self.root, &segments, data);
    }

    /// Merge the children of `data` into the node at `path`.
    pub fn patch(&mut self, path: &str, data: Value) {
        match data {
            Value::Object(children) => {
                let base = split_path(path);
                for (key, value) in children {
                    let mut segments = base.clone();
                    segments.extend(split_path(&key));
                    set_at(&mut self.root, &segments, value);
                }
            }
            other => self.put(path, other),
        }
    }

    /// Children decoded as notes, ordered by key, id taken from the key.
    #[must_use]
    pub fn notes(&self) -> Vec<Note> {
        let Value::Object(children) = &self.root else {
            return Vec::new();
        };

        let mut notes = children
            .iter()
            .filter_map(|(key, child)| decode_child(key, child))
            .collect::<Vec<_>>();
        notes.sort_by(|left, right| left.id.cmp(&right.id));
        notes
    }
}

/// Decode one child record, skipping values that are not note objects.
pub(crate) fn decode_child(key: &str, child: &Value) -> Option<Note> {
    let id = match key.parse::<NoteId>() {
        Ok(id) => id,
        Err(error) => {
            tracing::warn!("Skipping child with unusable key '{key}': {error}");
            return None;
        }
    };
    match serde_json::from_value::<Note>(child.clone()) {
        Ok(note) => Some(note.with_id(id)),
        Err(error) => {
            tracing::warn!("Skipping child '{key}' that is not a note: {error}");
            None
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn set_at(node: &mut Value, segments: &[String], data: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = data;
        prune(node);
        return;
    };

    if data.is_null() {
        if let Value::Object(children) = node {
            if let Some(child) = children.get_mut(first) {
                set_at(child, rest, Value::Null);
                if child.is_null() {
                    children.remove(first);
                }
            }
        }
        prune(node);
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(children) = node {
        let child = children.entry(first.clone()).or_insert(Value::Null);
        set_at(child, rest, data);
    }
    prune(node);
}

/// Collapse empty objects (recursively) to `null`.
fn prune(node: &mut Value) {
    if let Value::Object(children) = node {
        for child in children.values_mut() {
            prune(child);
        }
        children.retain(|_, child| !child.is_null());
        if children.is_empty() {
            *node = Value::Null;
        }
    }
}
