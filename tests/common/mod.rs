// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use trail_tracker::config::Config;
use trail_tracker::db::MemoryStore;
use trail_tracker::routes::create_router;
use trail_tracker::services::{ActivityProcessor, BadgeService, FreeTierAllowlist, TrailService};
use trail_tracker::time_utils::FixedClock;
use trail_tracker::AppState;

/// Instant every test app is pinned to unless stated otherwise.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap()
}

/// Load the bundled trail catalog.
#[allow(dead_code)]
pub fn test_trails() -> TrailService {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/trails.json");
    TrailService::load_from_file(path).expect("Failed to load trail catalog")
}

/// Create a test app pinned to `test_now()`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_at(test_now())
}

/// Create a test app whose clock is fixed at `now`.
#[allow(dead_code)]
pub fn create_test_app_at(now: DateTime<Utc>) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let trails = test_trails();
    let entitlement = FreeTierAllowlist::from_catalog(&trails);
    let processor = ActivityProcessor::new(
        Arc::new(MemoryStore::new()),
        trails,
        BadgeService::default(),
        Arc::new(FixedClock(now)),
    );

    let state = Arc::new(AppState {
        config,
        processor,
        entitlement,
    });

    (create_router(state.clone()), state)
}

/// Send one request and decode the JSON response body (`Value::Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    premium: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if premium {
        builder = builder.header("x-premium", "true");
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// PUT one day of activity with an explicit distance.
#[allow(dead_code)]
pub async fn put_activity(
    app: &axum::Router,
    user_id: &str,
    date: &str,
    steps: i64,
    distance_meters: f64,
) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/api/users/{user_id}/activity/{date}"),
        Some(serde_json::json!({ "steps": steps, "distance_meters": distance_meters })),
        false,
    )
    .await
}
