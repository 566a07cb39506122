//! Axum router construction for the API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`] with
//! CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/status` -- `WebSocket` status-change stream
/// - `POST /api/person-count` -- ingest one reading
/// - `GET /api/person-count` -- all sensors (dashboard feed)
/// - `GET /api/sensors/:id` -- single sensor detail
///
/// CORS is configured to allow any origin so the dashboard can be served
/// from anywhere. In production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/status", get(ws::ws_status))
        // REST API
        .route(
            "/api/person-count",
            get(handlers::person_count).post(handlers::ingest_reading),
        )
        .route("/api/sensors/{id}", get(handlers::get_sensor))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
