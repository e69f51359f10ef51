//! anonboard — realtime sync backend for a shared drawing canvas and a
//! shared text note, scoped by room.
//!
//! Clients bootstrap from the HTTP snapshot API (`/api/canvas/:room`,
//! `/api/note/:room`) and then exchange live deltas over the websocket
//! surfaces (`/ws/canvas/:room`, `/ws/note/:room`).

pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
