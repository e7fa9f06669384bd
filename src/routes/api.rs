// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes consumed by the app UI.
//!
//! Preferences arrive as query parameters and fall back to the configured
//! defaults. The premium entitlement is read from the `x-premium` header,
//! which the gateway in front of this service sets.

use crate::error::{AppError, Result};
use crate::models::{BadgeDefinition, EarnedBadge, LedgerStats, Preferences, TrailSummary};
use crate::services::units::distance_to_display;
use crate::services::{
    progression::LandmarkArrival, ActivityOutcome, DistanceUnit, EntitlementGate,
    FreeTierAllowlist, MonthCalendar, RunSnapshot, StreakSummary,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidateLength};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const PREMIUM_HEADER: &str = "x-premium";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trails", get(list_trails))
        .route("/api/users/{user_id}", delete(delete_user))
        .route("/api/users/{user_id}/activity/{date}", put(record_activity))
        .route("/api/users/{user_id}/calendar", get(get_calendar))
        .route("/api/users/{user_id}/streaks", get(get_streaks))
        .route("/api/users/{user_id}/stats", get(get_stats))
        .route("/api/users/{user_id}/badges", get(get_badges))
        .route("/api/users/{user_id}/runs/{trail_id}", post(start_run))
        .route("/api/users/{user_id}/runs/{trail_id}", get(get_run))
}

// ─── Request Context ─────────────────────────────────────────

/// Per-request preference overrides.
#[derive(Debug, Default, Deserialize)]
struct PreferencesQuery {
    goal: Option<u64>,
    stride_cm: Option<f64>,
    unit: Option<DistanceUnit>,
}

impl PreferencesQuery {
    fn resolve(&self, defaults: Preferences) -> Preferences {
        Preferences {
            daily_goal_steps: self.goal.unwrap_or(defaults.daily_goal_steps),
            stride_length_cm: self.stride_cm.unwrap_or(defaults.stride_length_cm),
            distance_unit: self.unit.unwrap_or(defaults.distance_unit),
        }
    }
}

fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.validate_length(Some(1), Some(64), None) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "user id must be 1-64 characters".to_string(),
        ))
    }
}

fn entitlement(state: &AppState, headers: &HeaderMap) -> FreeTierAllowlist {
    let premium = headers
        .get(PREMIUM_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    state.entitlement.for_account(premium)
}

// ─── Trails ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrailListing {
    #[serde(flatten)]
    pub trail: TrailSummary,
    pub total_distance_display: f64,
    pub accessible: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrailsResponse {
    pub trails: Vec<TrailListing>,
    pub unit: DistanceUnit,
}

async fn list_trails(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(prefs): Query<PreferencesQuery>,
) -> Json<TrailsResponse> {
    let prefs = prefs.resolve(state.config.default_preferences);
    let gate = entitlement(&state, &headers);
    let trails = state
        .processor
        .trails()
        .trails()
        .iter()
        .map(|t| TrailListing {
            trail: TrailSummary::from(t),
            total_distance_display: distance_to_display(
                t.total_distance_meters,
                prefs.distance_unit,
            ),
            accessible: gate.can_access(&t.id),
        })
        .collect();

    Json(TrailsResponse {
        trails,
        unit: prefs.distance_unit,
    })
}

// ─── Activity ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RecordActivityRequest {
    steps: i64,
    /// Derived from the stride length when omitted
    distance_meters: Option<f64>,
}

/// Record (or replace) one day's activity.
async fn record_activity(
    State(state): State<Arc<AppState>>,
    Path((user_id, date)): Path<(String, String)>,
    headers: HeaderMap,
    Query(prefs): Query<PreferencesQuery>,
    Json(body): Json<RecordActivityRequest>,
) -> Result<Json<ActivityOutcome>> {
    validate_user_id(&user_id)?;
    let prefs = prefs.resolve(state.config.default_preferences);
    let gate = entitlement(&state, &headers);

    let outcome = state
        .processor
        .record_activity(
            &user_id,
            &date,
            body.steps,
            body.distance_meters,
            &prefs,
            &gate,
        )
        .await
        .inspect_err(|e| {
            tracing::warn!(user_id = %user_id, date = %date, error = %e, "Rejected activity")
        })?;

    Ok(Json(outcome))
}

// ─── Calendar & Streaks ──────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub daily_goal_steps: u64,
    /// Oldest month first
    pub months: Vec<MonthCalendar>,
}

async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(prefs): Query<PreferencesQuery>,
) -> Result<Json<CalendarResponse>> {
    validate_user_id(&user_id)?;
    let prefs = prefs.resolve(state.config.default_preferences);
    let months = state.processor.calendar(&user_id, &prefs)?;

    Ok(Json(CalendarResponse {
        daily_goal_steps: prefs.daily_goal_steps,
        months,
    }))
}

async fn get_streaks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(prefs): Query<PreferencesQuery>,
) -> Result<Json<StreakSummary>> {
    validate_user_id(&user_id)?;
    let prefs = prefs.resolve(state.config.default_preferences);
    Ok(Json(state.processor.streaks(&user_id, &prefs)?))
}

// ─── Stats & Badges ──────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: LedgerStats,
    pub total_distance_display: f64,
    pub unit: DistanceUnit,
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(prefs): Query<PreferencesQuery>,
) -> Result<Json<StatsResponse>> {
    validate_user_id(&user_id)?;
    let prefs = prefs.resolve(state.config.default_preferences);
    let stats = state.processor.stats(&user_id)?;

    Ok(Json(StatsResponse {
        total_distance_display: distance_to_display(
            stats.total_distance_meters,
            prefs.distance_unit,
        ),
        unit: prefs.distance_unit,
        stats,
    }))
}

#[derive(Serialize)]
pub struct BadgesResponse {
    pub earned: Vec<EarnedBadge>,
    pub available: Vec<BadgeDefinition>,
}

async fn get_badges(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<BadgesResponse>> {
    validate_user_id(&user_id)?;
    Ok(Json(BadgesResponse {
        earned: state.processor.earned_badges(&user_id)?,
        available: state.processor.badges().definitions().to_vec(),
    }))
}

// ─── Trail Runs ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct StartRunRequest {
    #[validate(range(min = 1, max = 3650))]
    goal_days: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunResponse {
    #[serde(flatten)]
    pub run: RunSnapshot,
    pub cumulative_distance_display: f64,
    pub next_landmark_distance_display: Option<f64>,
    pub unit: DistanceUnit,
}

impl RunResponse {
    fn new(run: RunSnapshot, unit: DistanceUnit) -> Self {
        Self {
            cumulative_distance_display: distance_to_display(run.cumulative_distance_meters, unit),
            next_landmark_distance_display: run
                .next_landmark
                .as_ref()
                .map(|n| distance_to_display(n.distance_remaining_meters, unit)),
            unit,
            run,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StartRunResponse {
    #[serde(flatten)]
    pub run: RunResponse,
    pub arrivals: Vec<LandmarkArrival>,
    pub completed_now: bool,
    pub badges_unlocked: Vec<EarnedBadge>,
}

async fn start_run(
    State(state): State<Arc<AppState>>,
    Path((user_id, trail_id)): Path<(String, String)>,
    headers: HeaderMap,
    Query(prefs): Query<PreferencesQuery>,
    Json(body): Json<StartRunRequest>,
) -> Result<(StatusCode, Json<StartRunResponse>)> {
    validate_user_id(&user_id)?;
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let prefs = prefs.resolve(state.config.default_preferences);
    let gate = entitlement(&state, &headers);

    let started = state
        .processor
        .start_run(&user_id, &trail_id, body.goal_days, &prefs, &gate)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartRunResponse {
            run: RunResponse::new(started.run, prefs.distance_unit),
            arrivals: started.arrivals,
            completed_now: started.completed_now,
            badges_unlocked: started.badges_unlocked,
        }),
    ))
}

async fn get_run(
    State(state): State<Arc<AppState>>,
    Path((user_id, trail_id)): Path<(String, String)>,
    headers: HeaderMap,
    Query(prefs): Query<PreferencesQuery>,
) -> Result<Json<RunResponse>> {
    validate_user_id(&user_id)?;
    let prefs = prefs.resolve(state.config.default_preferences);
    let gate = entitlement(&state, &headers);
    let run = state.processor.run_snapshot(&user_id, &trail_id, &gate)?;
    Ok(Json(RunResponse::new(run, prefs.distance_unit)))
}

// ─── Account Erasure ─────────────────────────────────────────

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    validate_user_id(&user_id)?;
    tracing::info!(user_id = %user_id, "Account erasure requested");
    state.processor.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_query_falls_back_to_defaults() {
        let defaults = Preferences::default();
        let query = PreferencesQuery {
            goal: Some(6000),
            ..Default::default()
        };

        let prefs = query.resolve(defaults);

        assert_eq!(prefs.daily_goal_steps, 6000);
        assert_eq!(prefs.stride_length_cm, defaults.stride_length_cm);
        assert_eq!(prefs.distance_unit, defaults.distance_unit);
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("walker-42").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id(&"a".repeat(65)).is_err());
    }
}
