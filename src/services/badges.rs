// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge unlock evaluation.

use crate::models::badge::default_badges;
use crate::models::{BadgeAggregates, BadgeDefinition, EarnedBadge, LedgerStats};
use crate::services::streaks::StreakSummary;
use chrono::{DateTime, Utc};

/// Holds the badge definitions in evaluation order.
#[derive(Debug, Clone)]
pub struct BadgeService {
    definitions: Vec<BadgeDefinition>,
}

impl Default for BadgeService {
    fn default() -> Self {
        Self::new(default_badges())
    }
}

impl BadgeService {
    pub fn new(definitions: Vec<BadgeDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[BadgeDefinition] {
        &self.definitions
    }

    /// Badges whose criterion holds now and that were not already earned.
    ///
    /// Every newly satisfied badge is returned, in definition order.
    pub fn newly_unlocked(
        &self,
        aggregates: &BadgeAggregates,
        already_earned: &[EarnedBadge],
        now: DateTime<Utc>,
    ) -> Vec<EarnedBadge> {
        self.definitions
            .iter()
            .filter(|badge| !already_earned.iter().any(|e| e.badge_id == badge.id))
            .filter(|badge| badge.criterion.is_met(aggregates))
            .map(|badge| EarnedBadge {
                badge_id: badge.id.clone(),
                unlocked_at: now,
            })
            .collect()
    }
}

/// Collect badge inputs from the derived ledger facts.
pub fn build_aggregates(
    stats: &LedgerStats,
    streaks: StreakSummary,
    trails_completed: u32,
) -> BadgeAggregates {
    BadgeAggregates {
        total_lifetime_distance_meters: stats.total_distance_meters,
        total_steps: stats.total_steps,
        single_day_max_steps: stats.single_day_max_steps,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        trails_completed,
    }
}
