//! Integration tests for the API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing without
//! needing a live network connection. The engine under the router runs on
//! a manual clock so timeout behavior is exact.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, FixedOffset, TimeDelta};
use gatewatch_api::router::build_router;
use gatewatch_api::state::AppState;
use gatewatch_core::clock::{ManualClock, TimeSource};
use gatewatch_core::LivenessEngine;
use gatewatch_store::MemoryReadingStore;
use serde_json::Value;
use tower::ServiceExt;

fn start_instant() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-02-04T09:00:00+05:30").unwrap()
}

fn make_state() -> (Arc<AppState>, Arc<ManualClock>, Arc<LivenessEngine>) {
    let store = Arc::new(MemoryReadingStore::new());
    let clock = Arc::new(ManualClock::new(start_instant()));
    let engine = Arc::new(LivenessEngine::new(
        store,
        Arc::clone(&clock) as Arc<dyn TimeSource>,
        Duration::from_secs(8),
    ));
    let state = Arc::new(AppState::new(Arc::clone(&engine)));
    (state, clock, engine)
}

fn ingest_request(sensor_id: &str, batch: i64, total: u64) -> Request<Body> {
    let body = serde_json::json!({
        "sensor_id": sensor_id,
        "batch": batch,
        "total": total,
    });
    Request::post("/api/person-count")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_ingest_returns_ack_only() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router.oneshot(ingest_request("G1", 1, 5)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    // Acknowledgement only: no derived status in the response.
    assert!(json.get("status").is_none());
}

#[tokio::test]
async fn test_person_count_empty_is_bare_empty_array() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/person-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_ingest_then_person_count_has_dashboard_shape() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(ingest_request("G1", 3, 42))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/person-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    // Bare array, one row per sensor.
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["sensor_id"], "G1");
    assert_eq!(json[0]["batch"], 3);
    assert_eq!(json[0]["total"], 42);
    assert_eq!(json[0]["status"], "ONLINE");
    // last_seen must be ISO-8601.
    let parsed = DateTime::parse_from_rfc3339(json[0]["last_seen"].as_str().unwrap());
    assert!(parsed.is_ok());
}

#[tokio::test]
async fn test_person_count_lists_each_sensor_once() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    for (sensor, total) in [("G2", 10), ("G1", 5), ("G1", 6)] {
        let response = router
            .clone()
            .oneshot(ingest_request(sensor, 1, total))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .oneshot(
            Request::get("/api/person-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json.as_array().unwrap().len(), 2);
    // Ordered by sensor ID, each exactly once, latest totals.
    assert_eq!(json[0]["sensor_id"], "G1");
    assert_eq!(json[0]["total"], 6);
    assert_eq!(json[1]["sensor_id"], "G2");
    assert_eq!(json[1]["total"], 10);
}

#[tokio::test]
async fn test_get_sensor_by_id() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(ingest_request("G1", 1, 5))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::get("/api/sensors/G1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["sensor_id"], "G1");
    assert_eq!(json["status"], "ONLINE");
}

#[tokio::test]
async fn test_get_unknown_sensor_is_404() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/sensors/G9").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sweep_demotion_is_visible_in_responses() {
    let (state, clock, engine) = make_state();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(ingest_request("G1", 1, 5))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Past the 8-second timeout; the sweep demotes.
    clock.advance(TimeDelta::seconds(9));
    engine.sweep_once().await;

    let response = router
        .oneshot(
            Request::get("/api/person-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json[0]["status"], "OFFLINE");
    // Demotion only touches status; the count survives.
    assert_eq!(json[0]["total"], 5);
}

#[tokio::test]
async fn test_ingest_missing_field_is_rejected() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::post("/api/person-count")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"sensor_id": "G1", "batch": 1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let (state, _clock, _engine) = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
