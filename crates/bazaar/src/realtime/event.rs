use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversations::{ConversationId, MessageId};

/// Server-to-client websocket payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Chat {
        message: String,
        sender: String,
        timestamp: DateTime<Utc>,
        message_id: MessageId,
    },
    UnreadUpdate {
        conversation_id: ConversationId,
        count: usize,
    },
    UnreadCount {
        count: usize,
    },
    Error {
        message: String,
    },
}

impl Event {
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","message":"serialization failed"}"#.to_string()
        })
    }
}

/// Frame a chat socket client sends to post a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientFrame {
    #[serde(default)]
    pub message: Option<String>,
}

impl ClientFrame {
    /// Extract the message text or the error event to send back.
    pub fn parse(text: &str) -> Result<String, Event> {
        let frame: ClientFrame =
            serde_json::from_str(text).map_err(|_| Event::error("Invalid JSON format"))?;
        frame
            .message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .ok_or_else(|| Event::error("Missing required fields"))
    }
}

/// Frames accepted on the notification socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationFrame {
    MarkRead { conversation_id: ConversationId },
}

impl NotificationFrame {
    pub fn parse(text: &str) -> Result<Self, Event> {
        serde_json::from_str(text).map_err(|_| Event::error("Invalid JSON format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::UnreadUpdate {
            conversation_id: ConversationId(4),
            count: 2,
        };
        let value = serde_json::to_value(&event).expect("serializes");
        assert_eq!(
            value,
            json!({ "type": "unread_update", "conversation_id": 4, "count": 2 })
        );
    }

    #[test]
    fn chat_frames_require_a_message() {
        assert_eq!(
            ClientFrame::parse(r#"{"message": "  hello "}"#),
            Ok("hello".to_string())
        );
        assert_eq!(
            ClientFrame::parse("not json"),
            Err(Event::error("Invalid JSON format"))
        );
        assert_eq!(
            ClientFrame::parse(r#"{"message": "   "}"#),
            Err(Event::error("Missing required fields"))
        );
        assert_eq!(
            ClientFrame::parse(r#"{"other": 1}"#),
            Err(Event::error("Missing required fields"))
        );
    }

    #[test]
    fn notification_frames_parse_mark_read() {
        assert_eq!(
            NotificationFrame::parse(r#"{"type":"mark_read","conversation_id":9}"#),
            Ok(NotificationFrame::MarkRead {
                conversation_id: ConversationId(9)
            })
        );
        assert!(NotificationFrame::parse(r#"{"type":"ping"}"#).is_err());
    }
}
