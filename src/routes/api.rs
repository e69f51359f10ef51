//! HTTP snapshot endpoints.
//!
//! Read-only except for lazy room creation: unknown rooms come back as
//! empty state, never 404. A snapshot reflects every write completed
//! before the call, so a client can always bootstrap from HTTP and then
//! pick up live deltas over the websocket.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Serialize;

use crate::services;
use crate::state::{AppState, CanvasEvent};

#[derive(Debug, Serialize)]
pub struct CanvasSnapshot {
    pub events: Vec<CanvasEvent>,
}

#[derive(Debug, Serialize)]
pub struct NoteSnapshot {
    pub content: String,
}

/// `GET /api/canvas/:room` — full event log in append order.
pub async fn canvas_snapshot(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<CanvasSnapshot> {
    let events = services::canvas::snapshot(&state, &room).await;
    Json(CanvasSnapshot { events })
}

/// `GET /api/note/:room` — current note content.
pub async fn note_snapshot(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<NoteSnapshot> {
    let (content, _version) = services::note::get(&state, &room).await;
    Json(NoteSnapshot { content })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
