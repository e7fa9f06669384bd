// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user preferences passed explicitly into engine operations.

use crate::error::EngineError;
use crate::services::units::DistanceUnit;
use serde::{Deserialize, Serialize};

/// Preferences supplied by the profile layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Daily step goal (positive)
    pub daily_goal_steps: u64,
    /// Stride length in centimeters (positive)
    pub stride_length_cm: f64,
    /// Display unit for distances
    pub distance_unit: DistanceUnit,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            daily_goal_steps: 10_000,
            stride_length_cm: 75.0,
            distance_unit: DistanceUnit::Km,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.daily_goal_steps == 0 {
            return Err(EngineError::InvalidMeasurement(
                "daily goal must be positive".to_string(),
            ));
        }
        if !self.stride_length_cm.is_finite() || self.stride_length_cm <= 0.0 {
            return Err(EngineError::InvalidStride(self.stride_length_cm));
        }
        Ok(())
    }
}
