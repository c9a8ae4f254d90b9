//! Wire protocol for client-server communication.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use duo_chat_core::{ChatMessage, ConnectionStatus, FileUpload, HubEvent, Identity, MessageWithMeta};
use serde::{Deserialize, Serialize};

/// Protocol error.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary frame is not UTF-8")]
    NotUtf8,
}

/// Event from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Present a shared password.
    Authenticate(String),
    /// Send a chat message.
    ChatMessage(ChatMessage),
    /// Share an image.
    FileUpload(FileUpload),
    /// Keepalive.
    Ping,
}

impl ClientEvent {
    /// Parse a text frame.
    ///
    /// # Errors
    /// Returns error if the frame is not a known event.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Parse a binary frame holding UTF-8 JSON.
    ///
    /// # Errors
    /// Returns error if the frame is not UTF-8 or not a known event.
    pub fn parse_bytes(frame: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(frame).map_err(|_| ProtocolError::NotUtf8)?;
        Self::parse(text)
    }
}

/// Payload of `auth_success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSuccess {
    pub message: String,
    pub user_identity: Identity,
}

/// Event from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    AuthSuccess(AuthSuccess),
    AuthError(String),
    MessageReceived(Box<MessageWithMeta>),
    UserStatus(ConnectionStatus),
    Error(String),
    Pong,
}

impl ServerEvent {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

impl From<HubEvent> for ServerEvent {
    fn from(event: HubEvent) -> Self {
        match event {
            HubEvent::MessageReceived(msg) => Self::MessageReceived(msg),
            HubEvent::UserStatus(status) => Self::UserStatus(status),
        }
    }
}
