// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lifetime activity statistics derived from the ledger.
//!
//! Recomputed from the full ledger after each write so that backfilled
//! days are always reflected.

use crate::models::{ActivityEntry, ActivityLedger};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregates over a user's whole ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    // ─── Totals ──────────────────────────────────────────────────
    /// Total steps across all days
    #[serde(default)]
    pub total_steps: u64,
    /// Total distance across all days (meters)
    #[serde(default)]
    pub total_distance_meters: f64,
    /// Number of days with an entry
    #[serde(default)]
    pub days_logged: u32,
    /// Highest step count on a single day
    #[serde(default)]
    pub single_day_max_steps: u64,

    // ─── Time Series ─────────────────────────────────────────────
    /// Steps per month ("YYYY-MM")
    #[serde(default)]
    pub steps_by_month: BTreeMap<String, u64>,
    /// Distance per month ("YYYY-MM", meters)
    #[serde(default)]
    pub distance_by_month: BTreeMap<String, f64>,
}

impl LedgerStats {
    pub fn from_ledger(ledger: &ActivityLedger) -> Self {
        Self::accumulate(ledger.entries())
    }

    /// Statistics over entries dated on or before `until`.
    pub fn from_ledger_through(ledger: &ActivityLedger, until: NaiveDate) -> Self {
        Self::accumulate(ledger.entries().take_while(|e| e.date <= until))
    }

    fn accumulate<'a>(entries: impl Iterator<Item = &'a ActivityEntry>) -> Self {
        let mut stats = Self::default();

        for entry in entries {
            stats.total_steps += entry.steps;
            stats.total_distance_meters += entry.distance_meters;
            stats.days_logged += 1;
            stats.single_day_max_steps = stats.single_day_max_steps.max(entry.steps);

            let month_key = entry.date.format("%Y-%m").to_string();
            *stats.steps_by_month.entry(month_key.clone()).or_insert(0) += entry.steps;
            *stats.distance_by_month.entry(month_key).or_insert(0.0) += entry.distance_meters;
        }

        stats
    }
}
