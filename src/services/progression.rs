// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail progression calculator.
//!
//! Maps a run's cumulative distance onto its trail:
//! 1. Recompute progress fraction and the next unreached landmark
//! 2. Report every landmark crossed since the previous evaluation
//! 3. Mark the run complete the first time the full distance is reached
//!
//! All functions here are pure. They return the updated run instead of
//! mutating the caller's copy, so a rejected update leaves state untouched.

use crate::error::EngineError;
use crate::models::trail::distance_remaining_to;
use crate::models::{Landmark, Trail, TrailRun};
use crate::services::{EntitlementGate, TrailService};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The next unreached landmark and how far away it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NextLandmark {
    pub landmark: Landmark,
    pub distance_remaining_meters: f64,
}

/// A landmark reached during one update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LandmarkArrival {
    pub trail_id: String,
    pub landmark: Landmark,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub reached_at: DateTime<Utc>,
}

/// Result of advancing a run to a new cumulative distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressUpdate {
    pub trail_id: String,
    pub previous_distance_meters: f64,
    pub cumulative_distance_meters: f64,
    pub progress_fraction: f64,
    pub next_landmark: Option<NextLandmark>,
    /// Landmarks crossed by this update, in trail order
    pub arrivals: Vec<LandmarkArrival>,
    /// True only on the update that completed the trail
    pub completed_now: bool,
}

/// Schedule status of a run against its goal duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunPace {
    /// Days since the run started, counting the start day as day 1
    pub days_elapsed: u32,
    /// Goal days left, including today
    pub days_left: u32,
    pub remaining_distance_meters: f64,
    /// Daily distance needed to finish on time; `None` once overdue
    pub required_daily_distance_meters: Option<f64>,
    pub on_track: bool,
}

/// Current view of a run for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunSnapshot {
    pub trail_id: String,
    pub trail_name: String,
    pub cumulative_distance_meters: f64,
    pub total_distance_meters: f64,
    pub progress_fraction: f64,
    pub next_landmark: Option<NextLandmark>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub completed_at: Option<DateTime<Utc>>,
    pub pace: RunPace,
}

/// Next landmark summary for a cumulative distance.
pub fn next_landmark(trail: &Trail, cumulative_distance_meters: f64) -> Option<NextLandmark> {
    trail
        .landmark_at(cumulative_distance_meters)
        .map(|landmark| NextLandmark {
            landmark: landmark.clone(),
            distance_remaining_meters: distance_remaining_to(landmark, cumulative_distance_meters),
        })
}

/// Advance `run` to `new_cumulative_meters` on `trail`.
///
/// Re-running with an unchanged distance reports no arrivals. Completion is
/// reported once; later updates past the finish leave `completed_at` as is.
pub fn advance_run(
    trail: &Trail,
    run: &TrailRun,
    new_cumulative_meters: f64,
    now: DateTime<Utc>,
) -> Result<(TrailRun, ProgressUpdate), EngineError> {
    if run.trail_id != trail.id {
        return Err(EngineError::UnknownTrail(run.trail_id.clone()));
    }
    if !new_cumulative_meters.is_finite() {
        return Err(EngineError::InvalidMeasurement(format!(
            "cumulative distance must be finite, got {new_cumulative_meters}"
        )));
    }
    let previous = run.cumulative_distance_meters;
    if new_cumulative_meters < previous {
        return Err(EngineError::NonMonotonicDistance {
            previous,
            next: new_cumulative_meters,
        });
    }

    let arrivals: Vec<LandmarkArrival> = trail
        .landmarks_between(previous, new_cumulative_meters)
        .iter()
        .map(|landmark| LandmarkArrival {
            trail_id: trail.id.clone(),
            landmark: landmark.clone(),
            reached_at: now,
        })
        .collect();

    let mut updated = run.clone();
    updated.cumulative_distance_meters = new_cumulative_meters;

    let completed_now = updated.completed_at.is_none() && trail.is_complete(new_cumulative_meters);
    if completed_now {
        updated.completed_at = Some(now);
    }

    let update = ProgressUpdate {
        trail_id: trail.id.clone(),
        previous_distance_meters: previous,
        cumulative_distance_meters: new_cumulative_meters,
        progress_fraction: trail.progress_fraction(new_cumulative_meters),
        next_landmark: next_landmark(trail, new_cumulative_meters),
        arrivals,
        completed_now,
    };

    Ok((updated, update))
}

/// Pace of `run` against its goal duration as of `today`.
pub fn run_pace(trail: &Trail, run: &TrailRun, today: NaiveDate) -> RunPace {
    let days_elapsed = (today - run.start_date()).num_days().max(0) as u32 + 1;
    let days_left = run.goal_days.saturating_sub(days_elapsed - 1);
    let remaining = (trail.total_distance_meters - run.cumulative_distance_meters).max(0.0);

    let required_daily_distance_meters = if remaining == 0.0 {
        Some(0.0)
    } else if days_left > 0 {
        Some(remaining / days_left as f64)
    } else {
        None
    };

    let on_track = if run.is_completed() {
        true
    } else if run.goal_days == 0 {
        false
    } else {
        let expected = ((days_elapsed - 1) as f64 / run.goal_days as f64).min(1.0);
        trail.progress_fraction(run.cumulative_distance_meters) >= expected && days_left > 0
    };

    RunPace {
        days_elapsed,
        days_left,
        remaining_distance_meters: remaining,
        required_daily_distance_meters,
        on_track,
    }
}

/// Progression entry point that resolves trails and checks entitlement.
pub struct ProgressionCalculator<'a> {
    trails: &'a TrailService,
    gate: &'a dyn EntitlementGate,
}

impl<'a> ProgressionCalculator<'a> {
    pub fn new(trails: &'a TrailService, gate: &'a dyn EntitlementGate) -> Self {
        Self { trails, gate }
    }

    /// Resolve an accessible trail.
    pub fn trail(&self, trail_id: &str) -> Result<&'a Trail, EngineError> {
        let trail = self
            .trails
            .get(trail_id)
            .ok_or_else(|| EngineError::UnknownTrail(trail_id.to_string()))?;
        if !self.gate.can_access(trail_id) {
            return Err(EngineError::NotEntitled(trail_id.to_string()));
        }
        Ok(trail)
    }

    /// Start a fresh run on `trail_id`.
    pub fn start_run(
        &self,
        trail_id: &str,
        goal_days: u32,
        now: DateTime<Utc>,
    ) -> Result<TrailRun, EngineError> {
        self.trail(trail_id)?;
        if goal_days == 0 {
            return Err(EngineError::InvalidMeasurement(
                "goal days must be positive".to_string(),
            ));
        }
        Ok(TrailRun::new(trail_id, now, goal_days))
    }

    /// Advance a run to a new cumulative distance.
    pub fn advance(
        &self,
        run: &TrailRun,
        new_cumulative_meters: f64,
        now: DateTime<Utc>,
    ) -> Result<(TrailRun, ProgressUpdate), EngineError> {
        let trail = self.trail(&run.trail_id)?;
        advance_run(trail, run, new_cumulative_meters, now)
    }

    /// Advance a run by a distance delta. Negative deltas are rejected.
    pub fn advance_by(
        &self,
        run: &TrailRun,
        delta_meters: f64,
        now: DateTime<Utc>,
    ) -> Result<(TrailRun, ProgressUpdate), EngineError> {
        if delta_meters < 0.0 {
            return Err(EngineError::NonMonotonicDistance {
                previous: run.cumulative_distance_meters,
                next: run.cumulative_distance_meters + delta_meters,
            });
        }
        self.advance(run, run.cumulative_distance_meters + delta_meters, now)
    }

    /// Display view of a run on an accessible trail.
    pub fn snapshot(&self, run: &TrailRun, today: NaiveDate) -> Result<RunSnapshot, EngineError> {
        let trail = self.trail(&run.trail_id)?;
        let distance = run.cumulative_distance_meters;

        Ok(RunSnapshot {
            trail_id: trail.id.clone(),
            trail_name: trail.name.clone(),
            cumulative_distance_meters: distance,
            total_distance_meters: trail.total_distance_meters,
            progress_fraction: trail.progress_fraction(distance),
            next_landmark: next_landmark(trail, distance),
            completed_at: run.completed_at,
            pace: run_pace(trail, run, today),
        })
    }
}
