use serde::{Deserialize, Serialize};

/// One decoded frame from the per-turn answer stream.
///
/// The producer frames each event as a `data: {json}` line with a `type`
/// discriminator. `Content` carries the full section text accumulated so
/// far, not a delta.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    SectionStart {
        section: String,
    },
    Content {
        section: String,
        #[serde(default)]
        content: String,
    },
    SectionComplete {
        section: String,
    },
    Error {
        #[serde(default, alias = "content")]
        message: String,
    },
    /// End-of-turn marker emitted after the last section completes.
    Complete,
    #[serde(other)]
    Unknown,
}

/// Out-of-band notification from the push channel, independent of any turn.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    NewImage(ImageNotice),
    TodosUpdated(Vec<TodoItem>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageNotice {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_path: String,
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

/// Payload of a `todos_updated` push frame.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoSnapshotPayload {
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_event_decodes_tagged_variants() {
        let event: WireEvent =
            serde_json::from_str(r#"{"type":"section_start","section":"think"}"#).unwrap();
        assert_eq!(
            event,
            WireEvent::SectionStart {
                section: "think".to_string()
            }
        );

        let event: WireEvent =
            serde_json::from_str(r#"{"type":"content","section":"answer","content":"hi"}"#)
                .unwrap();
        assert_eq!(
            event,
            WireEvent::Content {
                section: "answer".to_string(),
                content: "hi".to_string()
            }
        );

        let event: WireEvent = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
        assert_eq!(event, WireEvent::Complete);
    }

    #[test]
    fn test_error_event_accepts_message_or_content_field() {
        let from_message: WireEvent =
            serde_json::from_str(r#"{"type":"error","message":"boom"}"#).unwrap();
        let from_content: WireEvent =
            serde_json::from_str(r#"{"type":"error","content":"boom"}"#).unwrap();
        assert_eq!(from_message, from_content);
    }

    #[test]
    fn test_unrecognized_event_type_maps_to_unknown() {
        let event: WireEvent = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(event, WireEvent::Unknown);
    }

    #[test]
    fn test_todo_status_uses_snake_case() {
        let item: TodoItem = serde_json::from_str(
            r#"{"id":"1","content":"generate network","status":"in_progress"}"#,
        )
        .unwrap();
        assert_eq!(item.status, TodoStatus::InProgress);
    }
}
