// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily activity entries and the per-user activity ledger.

use crate::error::EngineError;
use crate::time_utils::parse_date_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar day's measurement for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Calendar date (unique per user)
    pub date: NaiveDate,
    /// Steps logged for the day
    pub steps: u64,
    /// Distance covered for the day (meters)
    pub distance_meters: f64,
}

/// Sparse mapping from calendar date to that day's activity.
///
/// Keys are kept in a `BTreeMap` so every walk over the ledger is in
/// ascending date order, which keeps floating-point sums reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLedger {
    #[serde(default)]
    entries: BTreeMap<NaiveDate, ActivityEntry>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored entries. Later duplicates replace earlier ones.
    pub fn from_entries<I: IntoIterator<Item = ActivityEntry>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.date, e)).collect(),
        }
    }

    /// Insert or replace the entry for a "YYYY-MM-DD" date.
    ///
    /// Returns the entry that was replaced, if any. On error the ledger is
    /// left untouched.
    pub fn upsert(
        &mut self,
        date: &str,
        steps: i64,
        distance_meters: f64,
    ) -> Result<Option<ActivityEntry>, EngineError> {
        let date = parse_date_key(date)?;
        let entry = Self::validated_entry(date, steps, distance_meters)?;
        Ok(self.entries.insert(date, entry))
    }

    /// Validate a measurement without touching the ledger.
    pub fn validated_entry(
        date: NaiveDate,
        steps: i64,
        distance_meters: f64,
    ) -> Result<ActivityEntry, EngineError> {
        let steps = u64::try_from(steps).map_err(|_| {
            EngineError::InvalidMeasurement(format!("steps must be non-negative, got {steps}"))
        })?;
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(EngineError::InvalidMeasurement(format!(
                "distance must be a non-negative number, got {distance_meters}"
            )));
        }
        Ok(ActivityEntry {
            date,
            steps,
            distance_meters,
        })
    }

    /// Insert an already-validated entry, returning the one it replaced.
    pub fn insert(&mut self, entry: ActivityEntry) -> Option<ActivityEntry> {
        self.entries.insert(entry.date, entry)
    }

    /// Entry for `date`. `None` means nothing was logged, i.e. zero steps.
    pub fn get(&self, date: NaiveDate) -> Option<&ActivityEntry> {
        self.entries.get(&date)
    }

    /// Steps logged on `date`, zero when absent.
    pub fn steps_on(&self, date: NaiveDate) -> u64 {
        self.get(date).map(|e| e.steps).unwrap_or(0)
    }

    /// Entries within `[start, end]` in ascending date order. Gaps are not filled.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Vec<ActivityEntry> {
        if start > end {
            return Vec::new();
        }
        self.entries.range(start..=end).map(|(_, e)| e.clone()).collect()
    }

    /// Sum of `distance_meters` for every entry dated on or after `since`.
    pub fn cumulative_distance_since(&self, since: NaiveDate) -> f64 {
        self.entries
            .range(since..)
            .map(|(_, e)| e.distance_meters)
            .sum()
    }

    /// Sum of `distance_meters` for entries dated within `[since, until]`.
    pub fn cumulative_distance_between(&self, since: NaiveDate, until: NaiveDate) -> f64 {
        if since > until {
            return 0.0;
        }
        self.entries
            .range(since..=until)
            .map(|(_, e)| e.distance_meters)
            .sum()
    }

    /// All entries in ascending date order.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.values()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut ledger = ActivityLedger::new();
        assert!(ledger.upsert("2024-03-01", 1000, 750.0).unwrap().is_none());

        let previous = ledger.upsert("2024-03-01", 4000, 3000.0).unwrap();

        assert_eq!(previous.map(|e| e.steps), Some(1000));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.steps_on(day(1)), 4000);
    }

    #[test]
    fn test_upsert_rejects_bad_input_without_mutation() {
        let mut ledger = ActivityLedger::new();
        ledger.upsert("2024-03-01", 1000, 750.0).unwrap();

        assert!(matches!(
            ledger.upsert("2024-02-30", 10, 1.0),
            Err(EngineError::InvalidDate(_))
        ));
        assert!(matches!(
            ledger.upsert("2024-03-01", -1, 1.0),
            Err(EngineError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            ledger.upsert("2024-03-01", 10, -0.5),
            Err(EngineError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            ledger.upsert("2024-03-01", 10, f64::NAN),
            Err(EngineError::InvalidMeasurement(_))
        ));

        assert_eq!(ledger.steps_on(day(1)), 1000);
    }

    #[test]
    fn test_cumulative_distance_between_ignores_later_days() {
        let mut ledger = ActivityLedger::new();
        ledger.upsert("2024-03-01", 1, 100.0).unwrap();
        ledger.upsert("2024-03-02", 1, 200.0).unwrap();
        ledger.upsert("2024-03-04", 0, 5000.0).unwrap();

        assert_eq!(ledger.cumulative_distance_between(day(1), day(3)), 300.0);
        assert_eq!(ledger.cumulative_distance_between(day(2), day(4)), 5200.0);
        assert_eq!(ledger.cumulative_distance_between(day(4), day(1)), 0.0);
    }

    #[test]
    fn test_absent_day_is_zero_steps() {
        let ledger = ActivityLedger::new();
        assert!(ledger.get(day(5)).is_none());
        assert_eq!(ledger.steps_on(day(5)), 0);
    }

    #[test]
    fn test_range_is_inclusive_sorted_and_sparse() {
        let mut ledger = ActivityLedger::new();
        ledger.upsert("2024-03-05", 5, 5.0).unwrap();
        ledger.upsert("2024-03-01", 1, 1.0).unwrap();
        ledger.upsert("2024-03-03", 3, 3.0).unwrap();
        ledger.upsert("2024-03-09", 9, 9.0).unwrap();

        let dates: Vec<NaiveDate> = ledger
            .range(day(1), day(5))
            .into_iter()
            .map(|e| e.date)
            .collect();

        assert_eq!(dates, vec![day(1), day(3), day(5)]);
        assert!(ledger.range(day(6), day(2)).is_empty());
    }

    #[test]
    fn test_cumulative_distance_since_includes_start_date() {
        let mut ledger = ActivityLedger::new();
        ledger.upsert("2024-03-01", 0, 100.0).unwrap();
        ledger.upsert("2024-03-02", 0, 250.5).unwrap();
        ledger.upsert("2024-03-04", 0, 49.5).unwrap();

        assert_eq!(ledger.cumulative_distance_since(day(2)), 300.0);
        assert_eq!(ledger.cumulative_distance_since(day(1)), 400.0);
        assert_eq!(ledger.cumulative_distance_since(day(5)), 0.0);
    }
}
