//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own room state and business logic so route handlers
//! can stay focused on protocol translation and socket plumbing.

pub mod canvas;
pub mod note;
pub mod room;
