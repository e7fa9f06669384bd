// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail and landmark reference data, plus route lookups.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A named point of interest at a fixed distance along a trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Landmark {
    /// Landmark name (e.g., "Springer Mountain")
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cumulative distance from the trail start (meters)
    pub distance_meters: f64,
    /// Optional image or media reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

/// A trail definition: landmarks ordered by ascending distance.
///
/// The last landmark sits at `total_distance_meters`. Catalog loading
/// enforces both rules, see `TrailService`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub id: String,
    pub name: String,
    pub total_distance_meters: f64,
    /// Premium trails require an entitlement.
    #[serde(default)]
    pub premium: bool,
    pub landmarks: Vec<Landmark>,
}

impl Trail {
    /// The next unreached landmark for a cumulative distance.
    ///
    /// Returns `None` once the final landmark has been reached.
    pub fn landmark_at(&self, cumulative_distance_meters: f64) -> Option<&Landmark> {
        let idx = self.first_landmark_beyond(cumulative_distance_meters);
        self.landmarks.get(idx)
    }

    /// Share of the trail walked, clamped to `[0, 1]`.
    pub fn progress_fraction(&self, cumulative_distance_meters: f64) -> f64 {
        if self.total_distance_meters <= 0.0 {
            return 1.0;
        }
        (cumulative_distance_meters / self.total_distance_meters).clamp(0.0, 1.0)
    }

    /// Landmarks reached in `(previous, current]`, in ascending order.
    pub fn landmarks_between(&self, previous: f64, current: f64) -> &[Landmark] {
        if current <= previous {
            return &[];
        }
        let start = self.first_landmark_beyond(previous);
        let end = self.first_landmark_beyond(current);
        &self.landmarks[start..end]
    }

    pub fn is_complete(&self, cumulative_distance_meters: f64) -> bool {
        cumulative_distance_meters >= self.total_distance_meters
    }

    /// Index of the first landmark strictly beyond `distance`.
    fn first_landmark_beyond(&self, distance: f64) -> usize {
        self.landmarks
            .partition_point(|l| l.distance_meters <= distance)
    }
}

/// Meters left until `landmark`, never negative.
pub fn distance_remaining_to(landmark: &Landmark, cumulative_distance_meters: f64) -> f64 {
    (landmark.distance_meters - cumulative_distance_meters).max(0.0)
}

/// Trail listing for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrailSummary {
    pub id: String,
    pub name: String,
    pub total_distance_meters: f64,
    pub premium: bool,
    pub landmark_count: u32,
}

impl From<&Trail> for TrailSummary {
    fn from(trail: &Trail) -> Self {
        Self {
            id: trail.id.clone(),
            name: trail.name.clone(),
            total_distance_meters: trail.total_distance_meters,
            premium: trail.premium,
            landmark_count: trail.landmarks.len() as u32,
        }
    }
}
