//! Transport layer for the chat relay.
//!
//! Provides:
//! - Wire protocol (JSON events)
//! - Event dispatcher (auth gate, translation, fan-out)
//! - WebSocket and HTTP API routers (feature: websocket)

pub mod dispatch;
pub mod protocol;

#[cfg(feature = "websocket")]
pub mod api;
#[cfg(feature = "websocket")]
pub mod websocket;

pub use dispatch::{ChatState, Connection, Reply, UploadLimits};
pub use protocol::{ClientEvent, ProtocolError, ServerEvent};

#[cfg(feature = "websocket")]
pub use api::create_router;
