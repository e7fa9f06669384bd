// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod badges;
pub mod calendar;
pub mod entitlement;
pub mod progression;
pub mod streaks;
pub mod trails;
pub mod units;

pub use activity::{ActivityOutcome, ActivityProcessor, RunStarted};
pub use badges::BadgeService;
pub use calendar::{CalendarDay, DayStatus, MonthCalendar};
pub use entitlement::{EntitlementGate, FreeTierAllowlist};
pub use progression::{ProgressUpdate, ProgressionCalculator, RunSnapshot};
pub use streaks::StreakSummary;
pub use trails::{TrailCatalogError, TrailService};
pub use units::DistanceUnit;
