// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step and distance unit conversion.
//!
//! Conversions keep full precision. Rounding for display belongs to the caller.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Meters in one international mile.
pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_KM: f64 = 1000.0;

/// Display unit for distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Km,
    Mi,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Mi => "mi",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" => Ok(DistanceUnit::Km),
            "mi" => Ok(DistanceUnit::Mi),
            other => Err(format!("unknown distance unit '{other}'")),
        }
    }
}

/// Distance covered by `steps` at the given stride length, in meters.
pub fn steps_to_distance(steps: u64, stride_length_cm: f64) -> Result<f64, EngineError> {
    if !stride_length_cm.is_finite() || stride_length_cm <= 0.0 {
        return Err(EngineError::InvalidStride(stride_length_cm));
    }
    Ok(steps as f64 * stride_length_cm / 100.0)
}

/// Convert stored meters into the display unit.
pub fn distance_to_display(meters: f64, unit: DistanceUnit) -> f64 {
    match unit {
        DistanceUnit::Km => meters / METERS_PER_KM,
        DistanceUnit::Mi => meters / METERS_PER_MILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_to_distance_basic() {
        assert_eq!(steps_to_distance(10_000, 75.0).unwrap(), 7500.0);
        assert_eq!(steps_to_distance(0, 75.0).unwrap(), 0.0);
    }

    #[test]
    fn test_steps_to_distance_is_linear_and_monotonic() {
        let stride = 68.5;
        let mut last = 0.0;
        for steps in (0..50_000u64).step_by(997) {
            let d = steps_to_distance(steps, stride).unwrap();
            assert!(d >= last);
            last = d;
        }

        let a = steps_to_distance(1234, stride).unwrap();
        let b = steps_to_distance(4321, stride).unwrap();
        let sum = steps_to_distance(1234 + 4321, stride).unwrap();
        assert!((a + b - sum).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_stride_is_rejected() {
        assert_eq!(
            steps_to_distance(100, 0.0),
            Err(EngineError::InvalidStride(0.0))
        );
        assert!(steps_to_distance(100, -10.0).is_err());
        assert!(steps_to_distance(100, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_to_display() {
        assert_eq!(distance_to_display(12_000.0, DistanceUnit::Km), 12.0);
        assert_eq!(distance_to_display(1609.344, DistanceUnit::Mi), 1.0);
        // Full precision, no rounding
        assert_eq!(distance_to_display(1.0, DistanceUnit::Km), 0.001);
    }

    #[test]
    fn test_distance_unit_parse() {
        assert_eq!("KM".parse::<DistanceUnit>(), Ok(DistanceUnit::Km));
        assert_eq!(" mi ".parse::<DistanceUnit>(), Ok(DistanceUnit::Mi));
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }
}
