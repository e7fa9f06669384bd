// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and the injectable clock.

use crate::error::EngineError;
use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// Date key format used by the ledger and the API ("YYYY-MM-DD").
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a "YYYY-MM-DD" key into a calendar date.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT)
        .map_err(|_| EngineError::InvalidDate(raw.to_string()))
}

/// Format a calendar date as a "YYYY-MM-DD" key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// First day of the given month.
pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate, EngineError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDate(format!("{year:04}-{month:02}")))
}

/// Last day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, EngineError> {
    let first = first_day_of_month(year, month)?;
    let next_first = if month == 12 {
        first_day_of_month(year + 1, 1)?
    } else {
        first_day_of_month(year, month + 1)?
    };
    next_first
        .pred_opt()
        .ok_or_else(|| EngineError::InvalidDate(format_date_key(first)))
}

/// The month preceding `date`'s month, as (year, month).
pub fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

/// Source of the current instant.
///
/// Engine logic takes `now` as an argument; only the edges read a clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
