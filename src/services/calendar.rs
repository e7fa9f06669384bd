// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar and daily goal classification.
//!
//! A day is judged against "now", which is always passed in:
//! - after today: `Future`, whatever was logged
//! - today: `Achieved` once the goal is met, otherwise still `Future`
//! - before today: `Achieved` or `Failed`
//!
//! Nothing here is cached. Re-running after a backfill gives the new verdict.

use crate::error::EngineError;
use crate::models::ActivityLedger;
use crate::time_utils::{first_day_of_month, last_day_of_month, previous_month};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Goal status of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Achieved,
    Failed,
    /// Not yet judged: a later day, or today while the goal is still open
    Future,
}

/// One calendar cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarDay {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: u64,
    pub distance_meters: f64,
    pub status: DayStatus,
}

/// All cells of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Classify a single day's step total.
pub fn classify(steps: u64, goal_steps: u64, date: NaiveDate, today: NaiveDate) -> DayStatus {
    let met = steps >= goal_steps;
    if date > today {
        DayStatus::Future
    } else if met {
        DayStatus::Achieved
    } else if date == today {
        DayStatus::Future
    } else {
        DayStatus::Failed
    }
}

/// Classify `date` using the ledger. Missing entries count as zero steps.
pub fn classify_day(
    ledger: &ActivityLedger,
    goal_steps: u64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> DayStatus {
    classify(ledger.steps_on(date), goal_steps, date, now.date_naive())
}

/// Classify every day in `[start, end]`, filling gaps with zero-step cells.
pub fn classify_range(
    ledger: &ActivityLedger,
    goal_steps: u64,
    start: NaiveDate,
    end: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<CalendarDay> {
    let today = now.date_naive();
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let (steps, distance_meters) = ledger
                .get(date)
                .map(|e| (e.steps, e.distance_meters))
                .unwrap_or((0, 0.0));
            CalendarDay {
                date,
                steps,
                distance_meters,
                status: classify(steps, goal_steps, date, today),
            }
        })
        .collect()
}

/// Classify from the first logged day through today, for streak evaluation.
pub fn classify_history(
    ledger: &ActivityLedger,
    goal_steps: u64,
    now: DateTime<Utc>,
) -> Vec<CalendarDay> {
    match ledger.first_date() {
        Some(first) => classify_range(ledger, goal_steps, first, now.date_naive(), now),
        None => Vec::new(),
    }
}

/// Months visible in the calendar, oldest first.
///
/// Previous and current month, or only the current month in January.
pub fn viewing_window(now: DateTime<Utc>) -> Vec<(i32, u32)> {
    let today = now.date_naive();
    let current = (today.year(), today.month());
    if today.month() == 1 {
        vec![current]
    } else {
        vec![previous_month(today), current]
    }
}

/// Full calendar for one month.
pub fn month_calendar(
    ledger: &ActivityLedger,
    goal_steps: u64,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
) -> Result<MonthCalendar, EngineError> {
    let start = first_day_of_month(year, month)?;
    let end = last_day_of_month(year, month)?;
    Ok(MonthCalendar {
        year,
        month,
        days: classify_range(ledger, goal_steps, start, end, now),
    })
}

/// Calendars for every month in the viewing window.
pub fn visible_calendar(
    ledger: &ActivityLedger,
    goal_steps: u64,
    now: DateTime<Utc>,
) -> Result<Vec<MonthCalendar>, EngineError> {
    viewing_window(now)
        .into_iter()
        .map(|(year, month)| month_calendar(ledger, goal_steps, year, month, now))
        .collect()
}
