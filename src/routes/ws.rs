//! WebSocket handlers — live delta relay for both surfaces.
//!
//! DESIGN
//! ======
//! On upgrade, each connection gets a `Uuid` and a bounded mpsc channel,
//! registers with its room, and enters a `select!` loop:
//! - Incoming client messages → parse + apply + broadcast to room peers
//! - Broadcast messages from peers → forward to the socket
//!
//! Accepted events are never echoed back to the originating connection:
//! the canvas client draws its own stroke locally before sending, and the
//! note client's textarea already holds the typed value.
//!
//! Malformed messages and invalid strokes are dropped with no broadcast
//! and no error response; the connection stays open. Disconnect or a
//! failed socket write removes the subscriber from the room's set.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::{CanvasClientMessage, CanvasServerMessage, NoteClientMessage, NoteServerMessage};
use crate::services;
use crate::state::AppState;

/// Per-subscriber outbound queue depth. Overflow drops messages for that
/// subscriber only; the client resyncs via the snapshot API on reconnect.
const SUBSCRIBER_QUEUE: usize = 256;

// =============================================================================
// UPGRADE
// =============================================================================

/// `GET /ws/canvas/:room` — canvas surface.
pub async fn canvas_ws(
    State(state): State<AppState>,
    Path(room): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_canvas(socket, state, room))
}

/// `GET /ws/note/:room` — note surface.
pub async fn note_ws(
    State(state): State<AppState>,
    Path(room): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_note(socket, state, room))
}

// =============================================================================
// CANVAS CONNECTION
// =============================================================================

async fn run_canvas(mut socket: WebSocket, state: AppState, room: String) {
    let client_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<CanvasServerMessage>(SUBSCRIBER_QUEUE);

    services::room::join_canvas(&state, &room, client_id, tx).await;
    info!(%room, %client_id, "ws: canvas client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        handle_canvas_message(&state, &room, client_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outbound = rx.recv() => {
                let Some(outbound) = outbound else { break };
                if send_json(&mut socket, &outbound).await.is_err() {
                    break;
                }
            }
        }
    }

    services::room::part_canvas(&state, &room, client_id).await;
    info!(%room, %client_id, "ws: canvas client disconnected");
}

/// Parse one inbound canvas message, append the stroke, and broadcast it
/// to room peers. Separated from the socket loop so tests can drive it
/// with channel-registered subscribers.
async fn handle_canvas_message(state: &AppState, room: &str, client_id: Uuid, text: &str) {
    let msg: CanvasClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(%room, %client_id, error = %e, "ws: dropping malformed canvas message");
            return;
        }
    };

    match services::canvas::append(state, room, msg.stroke).await {
        Ok(event) => {
            let broadcast = CanvasServerMessage::stroke(event.stroke);
            services::room::broadcast_canvas(state, room, &broadcast, Some(client_id)).await;
        }
        Err(e) => {
            warn!(%room, %client_id, error = %e, "ws: dropping invalid stroke");
        }
    }
}

// =============================================================================
// NOTE CONNECTION
// =============================================================================

async fn run_note(mut socket: WebSocket, state: AppState, room: String) {
    let client_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<NoteServerMessage>(SUBSCRIBER_QUEUE);

    let content = services::room::join_note(&state, &room, client_id, tx).await;
    info!(%room, %client_id, "ws: note client connected");

    // Full current content first, so a late joiner starts in sync.
    if send_json(&mut socket, &NoteServerMessage::Init { content }).await.is_err() {
        services::room::part_note(&state, &room, client_id).await;
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        handle_note_message(&state, &room, client_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outbound = rx.recv() => {
                let Some(outbound) = outbound else { break };
                if send_json(&mut socket, &outbound).await.is_err() {
                    break;
                }
            }
        }
    }

    services::room::part_note(&state, &room, client_id).await;
    info!(%room, %client_id, "ws: note client disconnected");
}

/// Apply one inbound note update and broadcast the new content to room
/// peers.
async fn handle_note_message(state: &AppState, room: &str, client_id: Uuid, text: &str) {
    let NoteClientMessage::Update { content } = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(%room, %client_id, error = %e, "ws: dropping malformed note message");
            return;
        }
    };

    services::note::update(state, room, content.clone()).await;
    let broadcast = NoteServerMessage::Update { content };
    services::room::broadcast_note(state, room, &broadcast, Some(client_id)).await;
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_json<T: Serialize>(socket: &mut WebSocket, message: &T) -> Result<(), ()> {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize outbound message");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
