//! Broadcast fan-out to every authenticated session.

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};

use crate::{ConnectionStatus, MessageWithMeta};

/// Default channel capacity. Receivers further behind than this skip ahead.
const CHANNEL_CAPACITY: usize = 1024;

/// Event delivered to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    MessageReceived(Box<MessageWithMeta>),
    UserStatus(ConnectionStatus),
}

/// Pass-through broadcaster shared by all sessions.
#[derive(Clone)]
pub struct EventHub {
    sender: broadcast::Sender<HubEvent>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    /// Create a hub with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver an event to live subscribers. Returns how many there were.
    pub fn publish(&self, event: HubEvent) -> usize {
        // no subscribers is fine
        self.sender.send(event).unwrap_or(0)
    }

    /// Broadcast a chat message.
    pub fn publish_message(&self, message: MessageWithMeta) -> usize {
        self.publish(HubEvent::MessageReceived(Box::new(message)))
    }

    /// Broadcast connection counts.
    pub fn publish_status(&self, status: ConnectionStatus) -> usize {
        self.publish(HubEvent::UserStatus(status))
    }

    /// Get a receiver for live updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.sender.subscribe()
    }

    /// Live event stream; lagged events are logged and skipped.
    #[must_use]
    pub fn stream(&self) -> futures::stream::BoxStream<'static, HubEvent> {
        Self::into_stream(self.subscribe())
    }

    /// Turn an existing receiver into a stream, keeping its position.
    #[must_use]
    pub fn into_stream(
        receiver: broadcast::Receiver<HubEvent>,
    ) -> futures::stream::BoxStream<'static, HubEvent> {
        BroadcastStream::new(receiver)
            .filter_map(|res| async move {
                match res {
                    Ok(event) => Some(event),
                    Err(BroadcastStreamRecvError::Lagged(n)) => {
                        tracing::warn!("Subscriber lagged, skipped {n} events");
                        None
                    }
                }
            })
            .boxed()
    }
}
