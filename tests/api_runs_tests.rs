// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail run API tests: entitlement, landmarks and completion.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{put_activity, send};

async fn start(
    app: &axum::Router,
    trail_id: &str,
    premium: bool,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "POST",
        &format!("/api/users/walker/runs/{trail_id}"),
        Some(json!({ "goal_days": 30 })),
        premium,
    )
    .await
}

#[tokio::test]
async fn test_trail_listing_marks_accessibility() {
    let (app, _) = common::create_test_app();

    let (status, body) = send(&app, "GET", "/api/trails?unit=mi", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], "mi");

    let trails = body["trails"].as_array().unwrap();
    let inca = trails.iter().find(|t| t["id"] == "inca-trail").unwrap();
    let camino = trails.iter().find(|t| t["id"] == "camino-frances").unwrap();
    assert_eq!(inca["accessible"], true);
    assert_eq!(camino["accessible"], false);

    let (_, body) = send(&app, "GET", "/api/trails", None, true).await;
    assert!(body["trails"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["accessible"] == true));
}

#[tokio::test]
async fn test_premium_trail_requires_entitlement() {
    let (app, _) = common::create_test_app();

    let (status, body) = start(&app, "camino-frances", false).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "not_entitled");

    let (status, body) = start(&app, "camino-frances", true).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["trail_id"], "camino-frances");
    assert_eq!(body["cumulative_distance_meters"], 0.0);
}

#[tokio::test]
async fn test_unknown_trail_is_not_found() {
    let (app, _) = common::create_test_app();

    let (status, body) = start(&app, "pacific-crest-trail", true).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_trail");
}

#[tokio::test]
async fn test_goal_days_must_be_positive() {
    let (app, _) = common::create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/walker/runs/inca-trail",
        Some(json!({ "goal_days": 0 })),
        false,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_run_is_rejected() {
    let (app, _) = common::create_test_app();
    let (status, _) = start(&app, "inca-trail", false).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = start(&app, "inca-trail", false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_run_is_not_found() {
    let (app, _) = common::create_test_app();

    let (status, _) = send(&app, "GET", "/api/users/walker/runs/inca-trail", None, false).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_one_update_can_cross_several_landmarks() {
    let (app, _) = common::create_test_app();
    start(&app, "inca-trail", false).await;

    // Inca Trail landmarks sit at 7 km and 12 km
    let (status, body) = put_activity(&app, "walker", "2024-06-10", 17000, 13000.0).await;
    assert_eq!(status, StatusCode::OK);

    let update = &body["progress"][0];
    assert_eq!(update["trail_id"], "inca-trail");
    assert_eq!(update["previous_distance_meters"], 0.0);
    assert_eq!(update["cumulative_distance_meters"], 13000.0);
    let arrivals = update["arrivals"].as_array().unwrap();
    assert_eq!(arrivals.len(), 2);
    assert_eq!(arrivals[0]["landmark"]["distance_meters"], 7000.0);
    assert_eq!(arrivals[1]["landmark"]["distance_meters"], 12000.0);
    assert_eq!(update["next_landmark"]["landmark"]["distance_meters"], 21000.0);
    assert_eq!(update["next_landmark"]["distance_remaining_meters"], 8000.0);
    assert_eq!(update["completed_now"], false);
}

#[tokio::test]
async fn test_activity_before_run_start_does_not_count() {
    let (app, _) = common::create_test_app();
    put_activity(&app, "walker", "2024-06-09", 20000, 15000.0).await;
    put_activity(&app, "walker", "2024-06-10", 4000, 3000.0).await;

    let (_, body) = start(&app, "inca-trail", false).await;

    // Today's entry counts toward the new run, yesterday's does not
    assert_eq!(body["cumulative_distance_meters"], 3000.0);
}

#[tokio::test]
async fn test_lowering_counted_distance_conflicts() {
    let (app, state) = common::create_test_app();
    start(&app, "inca-trail", false).await;
    put_activity(&app, "walker", "2024-06-10", 8000, 6000.0).await;

    let (status, body) = put_activity(&app, "walker", "2024-06-10", 2000, 1500.0).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "non_monotonic_distance");
    assert_eq!(state.processor.stats("walker").unwrap().total_steps, 8000);
}

#[tokio::test]
async fn test_trail_completes_exactly_once() {
    let (app, _) = common::create_test_app();
    start(&app, "inca-trail", false).await;

    let (_, body) = put_activity(&app, "walker", "2024-06-10", 56000, 42000.0).await;
    assert_eq!(body["progress"][0]["completed_now"], true);
    assert_eq!(body["progress"][0]["progress_fraction"], 1.0);
    assert_eq!(body["progress"][0]["arrivals"].as_array().unwrap().len(), 7);

    let (_, body) = put_activity(&app, "walker", "2024-06-10", 60000, 45000.0).await;
    let progress = body["progress"].as_array().unwrap();
    assert!(progress.iter().all(|u| u["completed_now"] == false));

    let uri = "/api/users/walker/runs/inca-trail?unit=km";
    let (status, body) = send(&app, "GET", uri, None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["completed_at"].is_string());
    assert_eq!(body["progress_fraction"], 1.0);
    assert!(body["next_landmark"].is_null());
    assert_eq!(body["unit"], "km");
}

#[tokio::test]
async fn test_run_pace_reports_required_daily_distance() {
    let (app, _) = common::create_test_app();
    start(&app, "inca-trail", false).await;
    put_activity(&app, "walker", "2024-06-10", 8000, 6000.0).await;

    let (_, body) = send(&app, "GET", "/api/users/walker/runs/inca-trail", None, false).await;

    assert_eq!(body["pace"]["days_elapsed"], 1);
    assert_eq!(body["pace"]["days_left"], 30);
    assert_eq!(body["pace"]["remaining_distance_meters"], 36000.0);
    assert_eq!(body["pace"]["required_daily_distance_meters"], 1200.0);
}

#[tokio::test]
async fn test_start_reports_landmarks_reached_today() {
    let (app, _) = common::create_test_app();
    put_activity(&app, "walker", "2024-06-10", 25000, 19010.0).await;

    let (status, body) = start(&app, "west-highland-way", false).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cumulative_distance_meters"], 19010.0);
    let arrivals = body["arrivals"].as_array().unwrap();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0]["landmark"]["name"], "Drymen");
    assert_eq!(body["completed_now"], false);
    // Awarded by the earlier activity write, not again here
    assert!(body["badges_unlocked"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["badge_id"] != "first_steps"));

    let (_, body) = put_activity(&app, "walker", "2024-06-10", 25000, 19010.0).await;
    let progress = body["progress"].as_array().unwrap();
    assert!(progress
        .iter()
        .all(|u| u["arrivals"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn test_free_write_cannot_lower_premium_run() {
    let (app, state) = common::create_test_app();
    start(&app, "camino-frances", true).await;
    let uri = "/api/users/walker/activity/2024-06-10";
    let (status, _) = send(
        &app,
        "PUT",
        uri,
        Some(json!({ "steps": 8000, "distance_meters": 6000.0 })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = put_activity(&app, "walker", "2024-06-10", 1000, 750.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "non_monotonic_distance");
    assert_eq!(state.processor.stats("walker").unwrap().total_steps, 8000);

    // Raising the day without the entitlement lands but leaves the run alone
    let (status, _) = put_activity(&app, "walker", "2024-06-10", 9000, 6750.0).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/api/users/walker/runs/camino-frances", None, true).await;
    assert_eq!(body["cumulative_distance_meters"], 6000.0);

    // The next entitled write catches the run up
    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/walker/activity/2024-06-09",
        Some(json!({ "steps": 500, "distance_meters": 375.0 })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"][0]["trail_id"], "camino-frances");
    assert_eq!(body["progress"][0]["cumulative_distance_meters"], 6750.0);
}

#[tokio::test]
async fn test_premium_run_hidden_without_entitlement() {
    let (app, _) = common::create_test_app();
    start(&app, "camino-frances", true).await;

    let uri = "/api/users/walker/runs/camino-frances";
    let (status, body) = send(&app, "GET", uri, None, false).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "not_entitled");

    let (status, _) = send(&app, "GET", uri, None, true).await;
    assert_eq!(status, StatusCode::OK);
}
