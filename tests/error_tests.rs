// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use trail_tracker::error::{AppError, EngineError};

async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_engine_error_body_carries_code_and_details() {
    let (status, body) = body_json(EngineError::UnknownTrail("nowhere".to_string()).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_trail");
    assert!(body["details"].as_str().unwrap().contains("nowhere"));
}

#[tokio::test]
async fn test_non_monotonic_distance_is_conflict() {
    let err = EngineError::NonMonotonicDistance {
        previous: 5000.0,
        next: 4000.0,
    };

    let (status, body) = body_json(err.into()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "non_monotonic_distance");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, body) = body_json(AppError::Database("disk on fire".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("details").is_none() || body["details"].is_null());

    let (status, _) = body_json(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
