// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use crate::models::Preferences;
use crate::services::DistanceUnit;
use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Path to the trail catalog JSON
    pub trails_path: String,
    /// Preferences used when a request does not supply its own
    pub default_preferences: Preferences,
    /// Trails open to free accounts. `None` means every non-premium trail.
    pub free_trail_ids: Option<Vec<String>>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            trails_path: "data/trails.json".to_string(),
            default_preferences: Preferences::default(),
            free_trail_ids: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Preferences::default();
        let default_preferences = Preferences {
            daily_goal_steps: parse_var(
                &var,
                "DEFAULT_DAILY_GOAL_STEPS",
                defaults.daily_goal_steps,
            )?,
            stride_length_cm: parse_var(
                &var,
                "DEFAULT_STRIDE_LENGTH_CM",
                defaults.stride_length_cm,
            )?,
            distance_unit: parse_var(&var, "DEFAULT_DISTANCE_UNIT", defaults.distance_unit)?,
        };
        default_preferences
            .validate()
            .map_err(|e| ConfigError::Invalid("default preferences", e.to_string()))?;

        let free_trail_ids = var("FREE_TRAIL_IDS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        });

        Ok(Self {
            port: parse_var(&var, "PORT", 8080)?,
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            trails_path: var("TRAILS_PATH").unwrap_or_else(|| "data/trails.json".to_string()),
            default_preferences,
            free_trail_ids,
        })
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<F, T>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
