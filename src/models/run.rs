// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! A user's attempt at walking one trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Progression state for one (user, trail) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailRun {
    /// Referenced trail (not owned)
    pub trail_id: String,
    /// When the run was started
    pub started_at: DateTime<Utc>,
    /// User-chosen target duration in days
    pub goal_days: u32,
    /// Distance walked since the run started (meters, never decreases)
    #[serde(default)]
    pub cumulative_distance_meters: f64,
    /// Set once, the first time the full trail distance is reached
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TrailRun {
    pub fn new(trail_id: impl Into<String>, started_at: DateTime<Utc>, goal_days: u32) -> Self {
        Self {
            trail_id: trail_id.into(),
            started_at,
            goal_days,
            cumulative_distance_meters: 0.0,
            completed_at: None,
        }
    }

    /// First ledger date that counts towards this run.
    pub fn start_date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
