//! Router assembly.
//!
//! Binds the HTTP snapshot endpoints and the two websocket surfaces under
//! a single Axum router. CORS is permissive: the browser client is served
//! from a different origin and the API carries no credentials.

pub mod api;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/canvas/{room}", get(api::canvas_snapshot))
        .route("/api/note/{room}", get(api::note_snapshot))
        .route("/ws/canvas/{room}", get(ws::canvas_ws))
        .route("/ws/note/{room}", get(ws::note_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
