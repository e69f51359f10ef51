//! Room registry and realtime hub — subscriber tracking and fan-out.
//!
//! DESIGN
//! ======
//! Rooms are created lazily: every operation that names an unknown room
//! materializes an empty `RoomState` under the write lock, so concurrent
//! first accesses converge on a single instance. Rooms are never evicted.
//!
//! Broadcast is best-effort per subscriber: messages go through each
//! connection's bounded mpsc channel with `try_send`, so a slow or dead
//! peer can never stall fan-out to the rest of the room. Overflow is
//! logged and the message dropped for that subscriber only.

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::{CanvasServerMessage, NoteServerMessage};
use crate::state::AppState;

// =============================================================================
// REGISTRY
// =============================================================================

/// Ensure a room exists. Lazy creation; concurrent calls for the same id
/// land on one `RoomState`.
pub async fn ensure_room(state: &AppState, room: &str) {
    let mut rooms = state.rooms.write().await;
    rooms.entry(room.to_owned()).or_default();
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Register a canvas subscriber on a room.
pub async fn join_canvas(
    state: &AppState,
    room: &str,
    client_id: Uuid,
    tx: mpsc::Sender<CanvasServerMessage>,
) {
    let mut rooms = state.rooms.write().await;
    let room_state = rooms.entry(room.to_owned()).or_default();
    room_state.canvas_clients.insert(client_id, tx);
    info!(%room, %client_id, subscribers = room_state.canvas_clients.len(), "canvas client joined");
}

/// Register a note subscriber on a room. Returns the current note content
/// for the `init` message; reading it under the same write guard means no
/// update can slip between the init snapshot and the subscription.
pub async fn join_note(
    state: &AppState,
    room: &str,
    client_id: Uuid,
    tx: mpsc::Sender<NoteServerMessage>,
) -> String {
    let mut rooms = state.rooms.write().await;
    let room_state = rooms.entry(room.to_owned()).or_default();
    room_state.note_clients.insert(client_id, tx);
    info!(%room, %client_id, subscribers = room_state.note_clients.len(), "note client joined");
    room_state.note.content.clone()
}

/// Remove a canvas subscriber. No-op if the room or client is unknown.
pub async fn part_canvas(state: &AppState, room: &str, client_id: Uuid) {
    let mut rooms = state.rooms.write().await;
    let Some(room_state) = rooms.get_mut(room) else {
        return;
    };
    room_state.canvas_clients.remove(&client_id);
    info!(%room, %client_id, remaining = room_state.canvas_clients.len(), "canvas client left");
}

/// Remove a note subscriber. No-op if the room or client is unknown.
pub async fn part_note(state: &AppState, room: &str, client_id: Uuid) {
    let mut rooms = state.rooms.write().await;
    let Some(room_state) = rooms.get_mut(room) else {
        return;
    };
    room_state.note_clients.remove(&client_id);
    info!(%room, %client_id, remaining = room_state.note_clients.len(), "note client left");
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Broadcast a canvas message to all canvas subscribers of a room,
/// excluding the originating connection.
pub async fn broadcast_canvas(
    state: &AppState,
    room: &str,
    message: &CanvasServerMessage,
    exclude: Option<Uuid>,
) {
    let rooms = state.rooms.read().await;
    let Some(room_state) = rooms.get(room) else {
        return;
    };
    for (client_id, tx) in &room_state.canvas_clients {
        if exclude == Some(*client_id) {
            continue;
        }
        if tx.try_send(message.clone()).is_err() {
            warn!(%room, %client_id, "canvas subscriber queue full or closed; dropping message");
        }
    }
}

/// Broadcast a note message to all note subscribers of a room, excluding
/// the originating connection.
pub async fn broadcast_note(
    state: &AppState,
    room: &str,
    message: &NoteServerMessage,
    exclude: Option<Uuid>,
) {
    let rooms = state.rooms.read().await;
    let Some(room_state) = rooms.get(room) else {
        return;
    };
    for (client_id, tx) in &room_state.note_clients {
        if exclude == Some(*client_id) {
            continue;
        }
        if tx.try_send(message.clone()).is_err() {
            warn!(%room, %client_id, "note subscriber queue full or closed; dropping message");
        }
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
