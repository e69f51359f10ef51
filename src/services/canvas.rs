//! Canvas event log — validated, ordered stroke appends per room.
//!
//! DESIGN
//! ======
//! The log is append-only and events are never removed, so the next
//! sequence number is always `events.len() + 1`: gap-freedom is
//! structural, not bookkeeping. Sequence assignment happens under the
//! room map's write guard, which serializes concurrent appends to the
//! same room.

use tracing::info;

use crate::state::{AppState, CanvasEvent, Stroke};

/// Stroke size bounds, matching the client's slider range.
const MIN_SIZE: f64 = 1.0;
const MAX_SIZE: f64 = 30.0;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("stroke has no points")]
    EmptyStroke,
    #[error("point coordinates must be finite")]
    NonFinitePoint,
    #[error("stroke size must be a finite positive number, got {0}")]
    BadSize(f64),
    #[error("malformed color: {0:?}")]
    BadColor(String),
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate and append a stroke to a room's event log, assigning the next
/// sequence number for the room. Returns the stored event.
///
/// # Errors
///
/// Returns `ValidationError` if the stroke is empty, has non-finite
/// coordinates, a non-positive or non-finite size, or a malformed color.
pub async fn append(state: &AppState, room: &str, stroke: Stroke) -> Result<CanvasEvent, ValidationError> {
    let stroke = validate_stroke(stroke)?;

    let mut rooms = state.rooms.write().await;
    let room_state = rooms.entry(room.to_owned()).or_default();

    let event = CanvasEvent {
        seq: room_state.events.len() as u64 + 1,
        room: room.to_owned(),
        stroke,
    };
    room_state.events.push(event.clone());
    info!(%room, seq = event.seq, points = event.stroke.points.len(), "stroke appended");
    Ok(event)
}

/// All events of a room in append order. Creates the room if unseen, so
/// an empty room yields an empty snapshot rather than an error.
pub async fn snapshot(state: &AppState, room: &str) -> Vec<CanvasEvent> {
    let mut rooms = state.rooms.write().await;
    rooms.entry(room.to_owned()).or_default().events.clone()
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check stroke shape and normalize its size into `[MIN_SIZE, MAX_SIZE]`.
/// A single-point stroke is valid: minimal visual effect, but well-formed
/// data.
fn validate_stroke(mut stroke: Stroke) -> Result<Stroke, ValidationError> {
    if stroke.points.is_empty() {
        return Err(ValidationError::EmptyStroke);
    }
    if stroke.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(ValidationError::NonFinitePoint);
    }
    if !stroke.size.is_finite() || stroke.size <= 0.0 {
        return Err(ValidationError::BadSize(stroke.size));
    }
    if !is_well_formed_color(&stroke.color) {
        return Err(ValidationError::BadColor(stroke.color));
    }
    stroke.size = stroke.size.clamp(MIN_SIZE, MAX_SIZE);
    Ok(stroke)
}

/// Accept `#RGB` / `#RRGGBB` / `#RRGGBBAA` hex or an alphabetic CSS color
/// name. Anything else is rejected before it reaches other clients'
/// `ctx.strokeStyle`.
fn is_well_formed_color(color: &str) -> bool {
    if let Some(hex) = color.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !color.is_empty() && color.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod tests;
