// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail catalog loading and lookup service.

use crate::models::Trail;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk catalog layout: `{ "trails": [...] }`.
#[derive(Deserialize)]
struct TrailCatalogFile {
    trails: Vec<Trail>,
}

/// Service holding the shared, read-only trail definitions.
#[derive(Debug, Default, Clone)]
pub struct TrailService {
    trails: Vec<Trail>,
}

impl TrailService {
    /// Load trails from a JSON catalog file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrailCatalogError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| TrailCatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load trails from a JSON catalog string.
    pub fn load_from_json(json_data: &str) -> Result<Self, TrailCatalogError> {
        let catalog: TrailCatalogFile = serde_json::from_str(json_data)
            .map_err(|e| TrailCatalogError::ParseError(e.to_string()))?;
        let service = Self::from_trails(catalog.trails)?;
        tracing::info!(count = service.trails.len(), "Loaded trails");
        Ok(service)
    }

    /// Build the catalog from trail definitions, checking route invariants.
    pub fn from_trails(trails: Vec<Trail>) -> Result<Self, TrailCatalogError> {
        for (idx, trail) in trails.iter().enumerate() {
            validate_trail(trail)?;
            if trails[..idx].iter().any(|t| t.id == trail.id) {
                return Err(TrailCatalogError::DuplicateTrail(trail.id.clone()));
            }
        }
        Ok(Self { trails })
    }

    /// Get the list of trails.
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Look up a trail by identifier.
    pub fn get(&self, trail_id: &str) -> Option<&Trail> {
        self.trails.iter().find(|t| t.id == trail_id)
    }
}

fn validate_trail(trail: &Trail) -> Result<(), TrailCatalogError> {
    let invalid = |reason: &str| TrailCatalogError::InvalidTrail {
        trail_id: trail.id.clone(),
        reason: reason.to_string(),
    };

    if trail.id.is_empty() {
        return Err(invalid("empty id"));
    }
    if !trail.total_distance_meters.is_finite() || trail.total_distance_meters <= 0.0 {
        return Err(invalid("total distance must be positive"));
    }

    let last = trail
        .landmarks
        .last()
        .ok_or_else(|| invalid("trail has no landmarks"))?;

    if trail.landmarks[0].distance_meters <= 0.0 {
        return Err(invalid("first landmark must lie beyond the start"));
    }
    if trail
        .landmarks
        .windows(2)
        .any(|w| w[1].distance_meters <= w[0].distance_meters)
    {
        return Err(invalid("landmarks must be strictly ascending by distance"));
    }
    if last.distance_meters != trail.total_distance_meters {
        return Err(invalid("final landmark must sit at the total distance"));
    }

    Ok(())
}

/// Errors from trail catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum TrailCatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse trail catalog: {0}")]
    ParseError(String),

    #[error("Invalid trail '{trail_id}': {reason}")]
    InvalidTrail { trail_id: String, reason: String },

    #[error("Duplicate trail id: {0}")]
    DuplicateTrail(String),
}
