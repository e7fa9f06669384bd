// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge definitions and unlock criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Aggregates that badge criteria are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgeAggregates {
    pub total_lifetime_distance_meters: f64,
    pub total_steps: u64,
    pub single_day_max_steps: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub trails_completed: u32,
}

/// Unlock criterion. Each variant carries its threshold.
///
/// New badge kinds are added here; the evaluator only calls `is_met`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum BadgeCriterion {
    TotalDistanceMeters(f64),
    TotalSteps(u64),
    SingleDayMaxSteps(u64),
    CurrentStreakDays(u32),
    LongestStreakDays(u32),
    TrailsCompleted(u32),
}

impl BadgeCriterion {
    pub fn is_met(&self, aggregates: &BadgeAggregates) -> bool {
        match *self {
            BadgeCriterion::TotalDistanceMeters(min) => {
                aggregates.total_lifetime_distance_meters >= min
            }
            BadgeCriterion::TotalSteps(min) => aggregates.total_steps >= min,
            BadgeCriterion::SingleDayMaxSteps(min) => aggregates.single_day_max_steps >= min,
            BadgeCriterion::CurrentStreakDays(min) => aggregates.current_streak >= min,
            BadgeCriterion::LongestStreakDays(min) => aggregates.longest_streak >= min,
            BadgeCriterion::TrailsCompleted(min) => aggregates.trails_completed >= min,
        }
    }
}

/// Static badge definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub criterion: BadgeCriterion,
}

impl BadgeDefinition {
    fn new(id: &str, name: &str, description: &str, criterion: BadgeCriterion) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            criterion,
        }
    }
}

/// Record created the first time a badge's criterion holds. Never revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EarnedBadge {
    pub badge_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub unlocked_at: DateTime<Utc>,
}

/// Built-in badges, in evaluation order.
pub fn default_badges() -> Vec<BadgeDefinition> {
    vec![
        BadgeDefinition::new(
            "first_steps",
            "First Steps",
            "Log your first walk",
            BadgeCriterion::TotalSteps(1),
        ),
        BadgeDefinition::new(
            "big_day",
            "Big Day",
            "Walk 20,000 steps in a single day",
            BadgeCriterion::SingleDayMaxSteps(20_000),
        ),
        BadgeDefinition::new(
            "marathon",
            "Marathoner",
            "Walk a marathon distance in total",
            BadgeCriterion::TotalDistanceMeters(42_195.0),
        ),
        BadgeDefinition::new(
            "century",
            "Century Walker",
            "Walk 100 km in total",
            BadgeCriterion::TotalDistanceMeters(100_000.0),
        ),
        BadgeDefinition::new(
            "thousand_km",
            "Long Hauler",
            "Walk 1,000 km in total",
            BadgeCriterion::TotalDistanceMeters(1_000_000.0),
        ),
        BadgeDefinition::new(
            "week_streak",
            "Week Warrior",
            "Reach your daily goal 7 days in a row",
            BadgeCriterion::LongestStreakDays(7),
        ),
        BadgeDefinition::new(
            "month_streak",
            "Month Master",
            "Reach your daily goal 30 days in a row",
            BadgeCriterion::LongestStreakDays(30),
        ),
        BadgeDefinition::new(
            "on_fire",
            "On Fire",
            "Hold a current streak of 14 days",
            BadgeCriterion::CurrentStreakDays(14),
        ),
        BadgeDefinition::new(
            "trail_finisher",
            "Trail Finisher",
            "Complete a trail",
            BadgeCriterion::TrailsCompleted(1),
        ),
        BadgeDefinition::new(
            "trail_collector",
            "Trail Collector",
            "Complete five trails",
            BadgeCriterion::TrailsCompleted(5),
        ),
    ]
}
