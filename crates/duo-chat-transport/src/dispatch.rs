//! Event dispatcher: auth gate, auto-translate, broadcast.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use duo_chat_core::{
    ChatMessage, ConnectionId, ConnectionRegistry, EventHub, FileUpload, HubEvent, Identity,
    MessageKind, MessageWithMeta, PasswordTable, Translator, auto_translate,
};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::protocol::{AuthSuccess, ClientEvent, ServerEvent};

/// Images larger than this are rejected unless configured otherwise.
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Limits applied to shared files.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// State shared by every connection.
#[derive(Clone)]
pub struct ChatState {
    pub passwords: Arc<PasswordTable>,
    pub registry: Arc<ConnectionRegistry>,
    pub hub: EventHub,
    pub translator: Arc<dyn Translator>,
    pub limits: UploadLimits,
}

/// Per-connection dispatcher state.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    identity: Option<Identity>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// A fresh, unauthenticated connection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    #[must_use]
    pub const fn identity(&self) -> Option<Identity> {
        self.identity
    }
}

/// What the transport should do after an event.
#[derive(Debug)]
pub enum Reply {
    /// Nothing to send back.
    None,
    /// Send an event to this connection only.
    Send(ServerEvent),
    /// Authentication succeeded: send the event, then relay `events`.
    Authenticated {
        event: ServerEvent,
        events: broadcast::Receiver<HubEvent>,
    },
    /// Send the event, then close the connection.
    Close(ServerEvent),
}

impl ChatState {
    #[must_use]
    pub fn new(
        passwords: PasswordTable,
        translator: Arc<dyn Translator>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            passwords: Arc::new(passwords),
            registry: Arc::new(ConnectionRegistry::new()),
            hub: EventHub::new(),
            translator,
            limits,
        }
    }

    /// Handle one client event.
    pub async fn handle(&self, conn: &mut Connection, event: ClientEvent) -> Reply {
        match event {
            ClientEvent::Authenticate(password) => self.authenticate(conn, &password),
            ClientEvent::ChatMessage(message) => self.chat_message(conn, message).await,
            ClientEvent::FileUpload(upload) => self.file_upload(conn, upload),
            ClientEvent::Ping => Reply::Send(ServerEvent::Pong),
        }
    }

    /// Forget the connection and tell everyone the new counts.
    pub fn disconnect(&self, conn: &Connection) {
        if let Some((user, status)) = self.registry.unregister(conn.id) {
            self.hub.publish_status(status);
            tracing::info!(
                "{} disconnected ({}). User1: {}, User2: {}",
                user.user_identity,
                conn.id,
                status.user1_connections,
                status.user2_connections
            );
        } else {
            tracing::info!("Connection {} closed", conn.id);
        }
    }

    fn authenticate(&self, conn: &mut Connection, password: &str) -> Reply {
        let result = self.passwords.validate_password(password);
        let Some(identity) = result.user_identity.filter(|_| result.success) else {
            tracing::warn!("Authentication failed for connection {}", conn.id);
            return Reply::Close(ServerEvent::AuthError(result.message));
        };

        // subscribe first so this connection also sees the status update
        let events = self.hub.subscribe();
        let status = self.registry.register(conn.id, identity);
        conn.identity = Some(identity);
        self.hub.publish_status(status);

        tracing::info!(
            "{identity} authenticated ({}). User1: {}, User2: {}",
            conn.id,
            status.user1_connections,
            status.user2_connections
        );

        Reply::Authenticated {
            event: ServerEvent::AuthSuccess(AuthSuccess {
                message: result.message,
                user_identity: identity,
            }),
            events,
        }
    }

    /// Sender identity, if the registry knows this connection.
    fn sender(&self, conn: &Connection) -> Option<Identity> {
        self.registry
            .get(conn.id)
            .filter(|u| u.authenticated)
            .map(|u| u.user_identity)
    }

    async fn chat_message(&self, conn: &Connection, message: ChatMessage) -> Reply {
        let Some(identity) = self.sender(conn) else {
            return Reply::Send(ServerEvent::error(NOT_AUTHENTICATED));
        };

        // each kind carries only its own fields
        let message = match message.kind {
            MessageKind::Text => ChatMessage {
                file_name: None,
                file_data: None,
                file_type: None,
                ..message
            },
            MessageKind::File => {
                if let Err(reason) = self.check_file_fields(&message) {
                    return Reply::Send(ServerEvent::Error(reason));
                }
                ChatMessage {
                    text: None,
                    ..message
                }
            }
        };

        let mut meta = MessageWithMeta::new(message, conn.id, identity);

        if let Some(text) = meta.message.translatable_text() {
            match auto_translate(self.translator.as_ref(), text).await {
                Ok(translation) => {
                    tracing::debug!(
                        "Auto-translation for {identity}: {} -> {}",
                        translation.source_language,
                        translation.target_language
                    );
                    meta.translation = Some(translation);
                }
                Err(e) => tracing::warn!("Auto-translation failed: {e}"),
            }
        }

        let receivers = self.hub.publish_message(meta);
        tracing::debug!("Message from {identity} broadcast to {receivers} sessions");
        Reply::None
    }

    fn file_upload(&self, conn: &Connection, upload: FileUpload) -> Reply {
        let Some(identity) = self.sender(conn) else {
            return Reply::Send(ServerEvent::error(NOT_AUTHENTICATED));
        };

        let message = ChatMessage::from(upload);
        if let Err(reason) = self.check_file_fields(&message) {
            return Reply::Send(ServerEvent::Error(reason));
        }

        tracing::info!(
            "File shared by {identity}: {}",
            message.file_name.as_deref().unwrap_or_default()
        );
        self.hub
            .publish_message(MessageWithMeta::new(message, conn.id, identity));
        Reply::None
    }

    fn check_file_fields(&self, message: &ChatMessage) -> Result<(), String> {
        validate_image(
            message.file_name.as_deref().unwrap_or_default(),
            message.file_type.as_deref().unwrap_or_default(),
            message.file_data.as_deref().unwrap_or_default(),
            self.limits,
        )
    }
}

/// Check an image share: named, `image/*`, decodable, within size.
///
/// # Errors
/// Returns a message suitable for the client.
pub fn validate_image(
    file_name: &str,
    file_type: &str,
    file_data: &str,
    limits: UploadLimits,
) -> Result<(), String> {
    if file_name.trim().is_empty() {
        return Err("File name is required".to_string());
    }
    if !file_type.starts_with("image/") {
        return Err("Only image files are supported".to_string());
    }

    let payload = match file_data.strip_prefix("data:") {
        Some(url) => match url.split_once(',') {
            Some((header, body)) if header.ends_with(";base64") => {
                if !header.starts_with("image/") {
                    return Err("Only image files are supported".to_string());
                }
                body
            }
            _ => return Err("Invalid file data".to_string()),
        },
        None => file_data,
    };
    let payload = payload.trim();

    // every 4 base64 chars decode to 3 bytes, minus up to 2 of padding
    if (payload.len() / 4 * 3).saturating_sub(2) > limits.max_file_bytes {
        return Err(too_large(limits));
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|_| "Invalid file data".to_string())?;
    if bytes.is_empty() {
        return Err("File is empty".to_string());
    }
    if bytes.len() > limits.max_file_bytes {
        return Err(too_large(limits));
    }
    Ok(())
}

fn too_large(limits: UploadLimits) -> String {
    format!(
        "File too large. Maximum size is {}.",
        format_size(limits.max_file_bytes)
    )
}

/// Largest whole unit that divides `bytes` exactly: `5MB`, `512KB`, `100 bytes`.
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}
