// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail-Tracker: walk famous trails one day of steps at a time
//!
//! This crate provides the backend API that keeps each user's daily
//! activity ledger and derives trail progress, goal calendars, streaks
//! and badges from it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{ActivityProcessor, FreeTierAllowlist};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub processor: ActivityProcessor,
    /// Free-tier allowlist; premium accounts are layered on per request
    pub entitlement: FreeTierAllowlist,
}
