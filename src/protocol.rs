//! Wire messages for the two websocket surfaces.
//!
//! DESIGN
//! ======
//! Canvas and note rooms speak distinct, tiny JSON protocols:
//!
//! - Canvas, client → server: `{"stroke": {...}}`
//! - Canvas, server → client: `{"type":"stroke","data":{"stroke":{...}}}`
//! - Note, server → client:   `{"type":"init","content":"..."}` on connect,
//!   `{"type":"update","content":"..."}` on every accepted change
//! - Note, client → server:   `{"type":"update","content":"..."}`
//!
//! Server-to-client messages are internally tagged enums so the `type`
//! discriminator the browser switches on falls out of serde. Anything
//! that fails to deserialize is dropped at the socket, never answered.

use serde::{Deserialize, Serialize};

use crate::state::Stroke;

// =============================================================================
// CANVAS
// =============================================================================

/// Inbound canvas message: one finished stroke.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasClientMessage {
    pub stroke: Stroke,
}

/// Payload of a canvas broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePayload {
    pub stroke: Stroke,
}

/// Outbound canvas message, broadcast to room peers after a successful
/// append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasServerMessage {
    Stroke { data: StrokePayload },
}

impl CanvasServerMessage {
    #[must_use]
    pub fn stroke(stroke: Stroke) -> Self {
        Self::Stroke { data: StrokePayload { stroke } }
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// Inbound note message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NoteClientMessage {
    Update { content: String },
}

/// Outbound note message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NoteServerMessage {
    /// Full current content, sent once on connect.
    Init { content: String },
    /// New content after an accepted change.
    Update { content: String },
}

// =============================================================================
// TESTS
// =============================================================================
