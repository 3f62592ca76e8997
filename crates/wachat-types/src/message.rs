//! Chat message types for wachat.
//!
//! A `Message` is one conversational turn shown in the transcript. The
//! persistence shape (`NewMessage` / `StoredMessage`) adds the owner so the
//! store can scope queries per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::session::UserId;

/// Role of a message in the displayed and persisted transcript.
///
/// Only two variants exist: the system instruction is injected at
/// completion-request time and never becomes a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Identifier of a chat message.
///
/// Generated client-side (UUIDv7) before the insert and stored as the row
/// key, so a live transcript and a reloaded one carry the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single turn in the in-memory transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: MessageRole,
    pub created_at: DateTime<Utc>,
}

/// A message about to be written to the message store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: MessageId,
    pub owner: UserId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Build a message for `owner` with a fresh id and the current time.
    pub fn new(owner: UserId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            owner,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// The transcript entry matching this write.
    pub fn to_message(&self) -> Message {
        Message {
            id: self.id,
            content: self.content.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// A message as read back from the message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Store-assigned insertion sequence; authoritative ordering on reload.
    pub seq: i64,
    pub id: MessageId,
    pub owner: UserId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        Message {
            id: stored.id,
            content: stored.content,
            role: stored.role,
            created_at: stored.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_rejects_system() {
        let result: Result<MessageRole, _> = "system".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_new_message_to_message_keeps_id_and_timestamp() {
        let new = NewMessage::new(UserId::new("u-1").unwrap(), MessageRole::User, "Bonjour");
        let msg = new.to_message();
        assert_eq!(msg.id, new.id);
        assert_eq!(msg.created_at, new.created_at);
        assert_eq!(msg.content, "Bonjour");
        assert_eq!(msg.role, MessageRole::User);
    }

    #[test]
    fn test_message_ids_are_time_ordered() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert!(a < b);
    }
}
