//! WebSocket transport for chat sessions.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use duo_chat_core::{EventHub, HubEvent};
use futures::{SinkExt, StreamExt};
use tokio::{
    sync::{
        broadcast,
        mpsc::{self, error::TrySendError},
    },
    task::JoinHandle,
};

use crate::{
    dispatch::{ChatState, Connection, Reply},
    protocol::{ClientEvent, ServerEvent},
};

/// Events queued for one client before broadcasts are dropped.
const OUTBOUND_QUEUE: usize = 32;

/// WebSocket upgrade handler.
///
/// Use this as an Axum route handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ChatState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ChatState) {
    let (mut sender, mut receiver) = socket.split();
    let mut conn = Connection::new();
    tracing::info!("Connection opened: {}", conn.id());

    // Channel for sending messages to the client
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_QUEUE);

    // Spawn task to forward messages to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(j) => j,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Relays broadcasts once authenticated
    let mut relay_task: Option<JoinHandle<()>> = None;

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        let parsed = match msg {
            Ok(Message::Text(text)) => ClientEvent::parse(&text),
            Ok(Message::Binary(data)) => ClientEvent::parse_bytes(&data),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                break;
            }
        };

        let event = match parsed {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Invalid client message: {e}");
                let _ = tx.send(ServerEvent::error(e.to_string())).await;
                continue;
            }
        };

        match state.handle(&mut conn, event).await {
            Reply::None => {}
            Reply::Send(event) => {
                let _ = tx.send(event).await;
            }
            Reply::Authenticated { event, events } => {
                let _ = tx.send(event).await;
                if let Some(task) = relay_task.take() {
                    task.abort();
                }
                relay_task = Some(spawn_relay(events, tx.clone()));
            }
            Reply::Close(event) => {
                let _ = tx.send(event).await;
                break;
            }
        }
    }

    // Cleanup
    if let Some(task) = relay_task {
        task.abort();
    }
    state.disconnect(&conn);

    // Let queued replies (e.g. auth_error) flush before the writer stops
    drop(tx);
    let _ = send_task.await;
}

/// Forward hub events to one connection's outbound queue.
///
/// A client that stops reading fills its queue; further events are dropped
/// for that client instead of buffered.
fn spawn_relay(
    events: broadcast::Receiver<HubEvent>,
    tx: mpsc::Sender<ServerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = EventHub::into_stream(events);
        let mut dropped = 0usize;
        while let Some(event) = stream.next().await {
            match tx.try_send(event.into()) {
                Ok(()) => {
                    if dropped > 0 {
                        tracing::info!("Slow client caught up after {dropped} dropped events");
                        dropped = 0;
                    }
                }
                Err(TrySendError::Full(_)) => {
                    if dropped == 0 {
                        tracing::warn!("Outbound queue full, dropping events for slow client");
                    }
                    dropped += 1;
                }
                Err(TrySendError::Closed(_)) => break,
            }
        }
    })
}
