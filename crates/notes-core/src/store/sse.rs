//! Server-sent events framing for the realtime database streaming API.

use serde::Deserialize;
use serde_json::Value;

use crate::Result;

/// One dispatched `text/event-stream` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental parser; feed it raw chunks as they arrive.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.drain(..=newline).collect::<Vec<_>>();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            if self.event.is_none() && self.data.is_empty() {
                return None;
            }
            return Some(SseEvent {
                event: self.event.take().unwrap_or_else(|| "message".to_string()),
                data: std::mem::take(&mut self.data).join("\n"),
            });
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }
}

/// Realtime database stream events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StreamMessage {
    Put { path: String, data: Value },
    Patch { path: String, data: Value },
    KeepAlive,
    Cancel(String),
    AuthRevoked,
}

#[derive(Debug, Deserialize)]
struct PathData {
    path: String,
    data: Value,
}

impl StreamMessage {
    pub(crate) fn parse(event: &SseEvent) -> Result<Option<Self>> {
        let message = match event.event.as_str() {
            "put" => {
                let PathData { path, data } = serde_json::from_str(&event.data)?;
                Self::Put { path, data }
            }
            "patch" => {
                let PathData { path, data } = serde_json::from_str(&event.data)?;
                Self::Patch { path, data }
            }
            "keep-alive" => Self::KeepAlive,
            "cancel" => Self::Cancel(cancel_reason(&event.data)),
            "auth_revoked" => Self::AuthRevoked,
            other => {
                tracing::debug!("Ignoring unknown stream event '{other}'");
                return Ok(None);
            }
        };
        Ok(Some(message))
    }
}

fn cancel_reason(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(reason)) => reason,
        Ok(Value::Null) => "listener cancelled".to_string(),
        _ if data.trim().is_empty() => "listener cancelled".to_string(),
        _ => data.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_events_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: put\ndata: {\"path\":\"/\",").is_empty());
        let events = parser.push(b"\"data\":null}\r\n\r\nevent: keep-alive\ndata: null\n\n");

        assert_eq!(
            events,
            vec![
                SseEvent {
                    event: "put".to_string(),
                    data: r#"{"path":"/","data":null}"#.to_string(),
                },
                SseEvent {
                    event: "keep-alive".to_string(),
                    data: "null".to_string(),
                },
            ]
        );
    }

    #[test]
    fn comments_and_unknown_fields_are_ignored() {
        let mut parser = SseParser::new();
        let events = parser.push(b": hello\nid: 7\nevent: cancel\ndata: \"Permission denied\"\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(
            StreamMessage::parse(&events[0]).unwrap(),
            Some(StreamMessage::Cancel("Permission denied".to_string()))
        );
    }

    #[test]
    fn multi_line_data_is_joined() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: a\ndata: b\n\n");
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "a\nb");
    }

    #[test]
    fn put_and_patch_messages_decode_payloads() {
        let put = SseEvent {
            event: "put".to_string(),
            data: r#"{"path":"/-A","data":{"subject":"x"}}"#.to_string(),
        };
        assert_eq!(
            StreamMessage::parse(&put).unwrap(),
            Some(StreamMessage::Put {
                path: "/-A".to_string(),
                data: json!({"subject": "x"}),
            })
        );

        let patch = SseEvent {
            event: "patch".to_string(),
            data: r#"{"path":"/","data":{"-B":null}}"#.to_string(),
        };
        assert!(matches!(
            StreamMessage::parse(&patch).unwrap(),
            Some(StreamMessage::Patch { .. })
        ));
    }

    #[test]
    fn malformed_put_is_an_error() {
        let event = SseEvent {
            event: "put".to_string(),
            data: "not json".to_string(),
        };
        assert!(StreamMessage::parse(&event).is_err());
    }

    #[test]
    fn auth_revoked_and_unknown_events() {
        let revoked = SseEvent {
            event: "auth_revoked".to_string(),
            data: "null".to_string(),
        };
        assert_eq!(
            StreamMessage::parse(&revoked).unwrap(),
            Some(StreamMessage::AuthRevoked)
        );

        let unknown = SseEvent {
            event: "rules_changed".to_string(),
            data: String::new(),
        };
        assert_eq!(StreamMessage::parse(&unknown).unwrap(), None);
    }
}
