// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal streaks over a chronological sequence of day statuses.

use crate::services::calendar::DayStatus;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Current and longest goal streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Consecutive `Achieved` days ending at the most recent resolved day.
///
/// Trailing `Future` days (including an open today) are skipped rather
/// than breaking the streak.
pub fn current_streak(days: &[DayStatus]) -> u32 {
    days.iter()
        .rev()
        .skip_while(|s| **s == DayStatus::Future)
        .take_while(|s| **s == DayStatus::Achieved)
        .count() as u32
}

/// Longest run of consecutive `Achieved` days anywhere in `days`.
pub fn longest_streak(days: &[DayStatus]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for status in days {
        if *status == DayStatus::Achieved {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

pub fn summarize(days: &[DayStatus]) -> StreakSummary {
    StreakSummary {
        current: current_streak(days),
        longest: longest_streak(days),
    }
}
