//! Chat message data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Identity;

/// Connection identifier.
pub type ConnectionId = Uuid;

/// Kind of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    File,
}

/// Message as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl ChatMessage {
    /// Create a text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            text: Some(text.into()),
            file_name: None,
            file_data: None,
            file_type: None,
        }
    }

    /// Text worth translating: present and not blank.
    #[must_use]
    pub fn translatable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Image shared through the `file_upload` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub file_name: String,
    /// Usually a `data:` URL.
    pub file_data: String,
    pub file_type: String,
}

impl From<FileUpload> for ChatMessage {
    fn from(upload: FileUpload) -> Self {
        Self {
            kind: MessageKind::File,
            text: None,
            file_name: Some(upload.file_name),
            file_data: Some(upload.file_data),
            file_type: Some(upload.file_type),
        }
    }
}

/// Translation attached to a broadcast text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedMessage {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Message as broadcast to every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageWithMeta {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Connection the message came from.
    pub user_id: ConnectionId,
    pub user_identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslatedMessage>,
}

impl MessageWithMeta {
    /// Stamp a message with a fresh id and the current time.
    #[must_use]
    pub fn new(message: ChatMessage, sender: ConnectionId, identity: Identity) -> Self {
        Self {
            message,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: sender,
            user_identity: identity,
            translation: None,
        }
    }
}

/// Per-identity connection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub user1_connections: usize,
    pub user2_connections: usize,
    pub total_connections: usize,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn new(user1: usize, user2: usize) -> Self {
        Self {
            user1_connections: user1,
            user2_connections: user2,
            total_connections: user1 + user2,
        }
    }
}
