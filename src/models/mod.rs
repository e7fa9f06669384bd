// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod badge;
pub mod run;
pub mod stats;
pub mod trail;
pub mod user;

pub use activity::{ActivityEntry, ActivityLedger};
pub use badge::{BadgeAggregates, BadgeCriterion, BadgeDefinition, EarnedBadge};
pub use run::TrailRun;
pub use stats::LedgerStats;
pub use trail::{Landmark, Trail, TrailSummary};
pub use user::Preferences;
