//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds a map of live rooms keyed by the opaque room identifier from
//! the URL path. Each room owns an append-only canvas event log, the
//! shared note document, and the subscriber sets for both surfaces.
//!
//! Rooms are created lazily on first access and live for the process
//! lifetime — there is no eviction, so a snapshot taken after any
//! successful append is always replayable.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::protocol::{CanvasServerMessage, NoteServerMessage};

// =============================================================================
// DOMAIN TYPES
// =============================================================================

/// A single point of a stroke, in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One continuous freehand drawing gesture. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
}

/// A stroke as stored in a room's event log, with its server-assigned
/// sequence number. Sequence numbers within a room start at 1 and are
/// strictly increasing with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEvent {
    pub seq: u64,
    pub room: String,
    pub stroke: Stroke,
}

/// The shared note document. `version` only ever increases; concurrent
/// updates apply in arrival order (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDoc {
    pub content: String,
    pub version: u64,
}

// =============================================================================
// ROOM STATE
// =============================================================================

/// Per-room live state. The canvas log and note document are the source
/// of truth; subscriber maps hold the outbound channel for each open
/// websocket connection, keyed by connection id.
#[derive(Default)]
pub struct RoomState {
    /// Append-only stroke log in sequence order.
    pub events: Vec<CanvasEvent>,
    /// Shared note content plus monotonic version.
    pub note: NoteDoc,
    /// Canvas subscribers: connection id -> sender for outgoing messages.
    pub canvas_clients: HashMap<Uuid, mpsc::Sender<CanvasServerMessage>>,
    /// Note subscribers: connection id -> sender for outgoing messages.
    pub note_clients: HashMap<Uuid, mpsc::Sender<NoteServerMessage>>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the room map is Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<String, RoomState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: Arc::new(RwLock::new(HashMap::new())) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
