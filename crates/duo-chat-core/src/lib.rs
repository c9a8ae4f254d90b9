//! Core abstractions for the two-party chat relay.
//!
//! This crate provides the fundamental building blocks:
//! - `Identity` and `PasswordTable` - the two fixed roles and their secrets
//! - `MessageWithMeta` - messages as they are broadcast
//! - `ConnectionRegistry` - which connections belong to which identity
//! - `EventHub` - fan-out to every authenticated session
//! - `Translator` trait and the auto-translate rule

pub mod auth;
pub mod hub;
pub mod identity;
pub mod languages;
pub mod message;
pub mod registry;
pub mod traits;
pub mod translation;

pub use auth::{AuthError, AuthResult, PasswordTable};
pub use hub::{EventHub, HubEvent};
pub use identity::Identity;
pub use languages::{LanguageOption, SUPPORTED_LANGUAGES};
pub use message::{
    ChatMessage, ConnectionId, ConnectionStatus, FileUpload, MessageKind, MessageWithMeta,
    TranslatedMessage,
};
pub use registry::{ConnectedUser, ConnectionRegistry};
pub use traits::{DisabledTranslator, LanguageInfo, TranslateError, Translation, Translator};
pub use translation::{auto_translate, target_language_for};
