//! Note state — one shared text document per room with monotonic
//! versioning.
//!
//! Updates are accepted unconditionally (no merge) and serialized by the
//! room map's write guard, so no update is lost; later updates overwrite
//! earlier ones. Last write wins is the contract, matching the client's
//! debounced keystroke coalescing.

use tracing::info;

use crate::state::AppState;

/// Current content and version of a room's note. Empty string, version 0
/// for unseen rooms (lazily created).
pub async fn get(state: &AppState, room: &str) -> (String, u64) {
    let mut rooms = state.rooms.write().await;
    let note = &rooms.entry(room.to_owned()).or_default().note;
    (note.content.clone(), note.version)
}

/// Replace a room's note content and bump the version. Returns the new
/// version.
pub async fn update(state: &AppState, room: &str, content: String) -> u64 {
    let mut rooms = state.rooms.write().await;
    let note = &mut rooms.entry(room.to_owned()).or_default().note;
    note.content = content;
    note.version += 1;
    info!(%room, version = note.version, bytes = note.content.len(), "note updated");
    note.version
}

#[cfg(test)]
#[path = "note_test.rs"]
mod tests;
