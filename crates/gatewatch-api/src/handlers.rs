//! REST endpoint handlers for the API server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `POST` | `/api/person-count` | Ingest one reading |
//! | `GET` | `/api/person-count` | Snapshot of all sensors (bare array) |
//! | `GET` | `/api/sensors/:id` | Single sensor detail |
//!
//! The snapshot endpoint returns a **bare JSON array** -- the dashboard
//! collaborator builds its table straight from the response body and
//! indexes `sensor_id` / `total` / `status` / `last_seen` on each row, so
//! the rows are not wrapped in an envelope.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use gatewatch_types::{SensorId, SensorSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the `POST /api/person-count` ingestion endpoint.
///
/// The timestamp is never part of the body: the server assigns it from the
/// shared wall clock at ingestion time.
#[derive(Debug, serde::Deserialize)]
pub struct IngestRequest {
    /// The reporting sensor's stable identifier.
    pub sensor_id: String,
    /// Sensor-local batch counter.
    pub batch: i64,
    /// Cumulative person count.
    pub total: u64,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing service status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.engine.snapshot().await;
    let sensor_count = snapshot.len();
    let online_count = snapshot.iter().filter(|s| s.status.is_online()).count();
    let offline_count = sensor_count.saturating_sub(online_count);
    let grand_total = snapshot
        .iter()
        .fold(0_u64, |sum, s| sum.saturating_add(s.total));

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Gatewatch</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Gatewatch</h1>
    <p class="subtitle">Gate sensor liveness service</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Gates</div>
            <div class="value">{sensor_count}</div>
        </div>
        <div class="metric">
            <div class="label">Online</div>
            <div class="value">{online_count}</div>
        </div>
        <div class="metric">
            <div class="label">Offline</div>
            <div class="value">{offline_count}</div>
        </div>
        <div class="metric">
            <div class="label">Persons counted</div>
            <div class="value">{grand_total}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/person-count">/api/person-count</a> -- All sensors (dashboard feed)</li>
        <li>POST /api/person-count -- Ingest a reading</li>
        <li>GET /api/sensors/:id -- Single sensor detail</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/status</code> -- Live status-change stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// POST /api/person-count -- ingest a reading
// ---------------------------------------------------------------------------

/// Ingest one reading: append it to the store and promote the sensor to
/// ONLINE.
///
/// The response is an acknowledgement only; no derived status is returned.
/// A storage failure maps to HTTP 500 so the sensor can retry.
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IngestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reading = state
        .engine
        .ingest(SensorId::from(body.sensor_id), body.batch, body.total)
        .await?;

    tracing::debug!(
        sensor_id = %reading.sensor_id,
        batch = reading.batch,
        total = reading.total,
        "reading ingested"
    );

    Ok(Json(serde_json::json!({ "ok": true })))
}

// ---------------------------------------------------------------------------
// GET /api/person-count -- all sensors, dashboard shape
// ---------------------------------------------------------------------------

/// Return the current snapshot of every sensor ever seen, as a bare JSON
/// array ordered by sensor ID.
///
/// Reflects the engine's state at a single consistent instant; no sensor
/// appears twice and none is dropped by a concurrent sweep or ingest.
pub async fn person_count(State(state): State<Arc<AppState>>) -> Json<Vec<SensorSnapshot>> {
    Json(state.engine.snapshot().await)
}

// ---------------------------------------------------------------------------
// GET /api/sensors/:id -- single sensor detail
// ---------------------------------------------------------------------------

/// Return the current view of a single sensor.
///
/// A sensor with no readings yet is absent (HTTP 404), not an error.
pub async fn get_sensor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SensorSnapshot>, ApiError> {
    let sensor_id = SensorId::from(id);
    state
        .engine
        .sensor(&sensor_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("sensor {sensor_id}")))
}
