// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity recording service.
//!
//! Handles the core workflow for one ledger write:
//! 1. Validate the measurement and upsert it into a copy of the ledger
//! 2. Re-derive every trail run's distance from the ledger
//! 3. Reclassify the day history and recompute streaks
//! 4. Evaluate badges against the fresh aggregates
//! 5. Commit the entry, runs and badges in one store write
//!
//! Work for one user is serialized by a per-user lock; different users
//! proceed in parallel.

use crate::db::{ActivityStore, ActivityWrite};
use crate::error::{AppError, EngineError, Result};
use crate::models::{
    ActivityEntry, ActivityLedger, EarnedBadge, LedgerStats, Preferences, TrailRun,
};
use crate::services::badges::build_aggregates;
use crate::services::calendar::{self, DayStatus, MonthCalendar};
use crate::services::progression::{
    self, LandmarkArrival, ProgressUpdate, ProgressionCalculator, RunSnapshot,
};
use crate::services::streaks::{self, StreakSummary};
use crate::services::units::steps_to_distance;
use crate::services::{BadgeService, EntitlementGate, TrailService};
use crate::time_utils::{format_utc_rfc3339, parse_date_key, Clock};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-user write locks, keyed by user id.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Everything a single ledger write produced.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityOutcome {
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "{ date: string, steps: number, distance_meters: number }")
    )]
    pub entry: ActivityEntry,
    /// Status of the written day after the write
    pub day_status: DayStatus,
    /// One update per trail run that moved or completed
    pub progress: Vec<ProgressUpdate>,
    pub streaks: StreakSummary,
    pub badges_unlocked: Vec<EarnedBadge>,
}

/// A freshly started run and what the day's existing activity did to it.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunStarted {
    pub run: RunSnapshot,
    /// Landmarks already reached by activity logged on the start day
    pub arrivals: Vec<LandmarkArrival>,
    pub completed_now: bool,
    pub badges_unlocked: Vec<EarnedBadge>,
}

/// Records activity and derives progression, streaks and badges.
#[derive(Clone)]
pub struct ActivityProcessor {
    store: Arc<dyn ActivityStore>,
    trails: TrailService,
    badges: BadgeService,
    clock: Arc<dyn Clock>,
    user_locks: UserLocks,
}

impl ActivityProcessor {
    pub fn new(
        store: Arc<dyn ActivityStore>,
        trails: TrailService,
        badges: BadgeService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            trails,
            badges,
            clock,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn trails(&self) -> &TrailService {
        &self.trails
    }

    pub fn badges(&self) -> &BadgeService {
        &self.badges
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Record one day's activity for a user.
    ///
    /// When `distance_meters` is omitted it is derived from `steps` and the
    /// stride length. The write is rejected as a whole if any step fails.
    pub async fn record_activity(
        &self,
        user_id: &str,
        date: &str,
        steps: i64,
        distance_meters: Option<f64>,
        prefs: &Preferences,
        gate: &dyn EntitlementGate,
    ) -> Result<ActivityOutcome> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;
        let now = self.clock.now();
        let today = now.date_naive();

        prefs.validate()?;
        let date = parse_date_key(date)?;
        let distance_meters = match distance_meters {
            Some(d) => d,
            None => {
                let steps = u64::try_from(steps).map_err(|_| {
                    EngineError::InvalidMeasurement(format!(
                        "steps must be non-negative, got {steps}"
                    ))
                })?;
                steps_to_distance(steps, prefs.stride_length_cm)?
            }
        };
        let entry = ActivityLedger::validated_entry(date, steps, distance_meters)?;
        if entry.date > today && (entry.steps > 0 || entry.distance_meters > 0.0) {
            return Err(EngineError::InvalidDate(format!(
                "{} is in the future",
                entry.date
            ))
            .into());
        }

        let mut ledger = self.store.load_ledger(user_id)?;
        let replaced = ledger.insert(entry.clone());

        tracing::debug!(
            user_id,
            date = %entry.date,
            steps = entry.steps,
            replaced = replaced.is_some(),
            "Recording activity"
        );

        // Re-derive runs from the full ledger so backfilled days count too
        let mut runs = self.store.list_trail_runs(user_id)?;
        let mut progress = Vec::new();
        let mut changed_runs = Vec::new();

        for run in runs.iter_mut() {
            let Some(trail) = self.trails.get(&run.trail_id) else {
                tracing::warn!(user_id, trail_id = %run.trail_id, "Skipping run on unknown trail");
                continue;
            };
            let cumulative = ledger.cumulative_distance_between(run.start_date(), today);

            // Counted distance may never shrink, whoever is asking
            if cumulative < run.cumulative_distance_meters {
                return Err(EngineError::NonMonotonicDistance {
                    previous: run.cumulative_distance_meters,
                    next: cumulative,
                }
                .into());
            }
            if !gate.can_access(&run.trail_id) {
                tracing::debug!(user_id, trail_id = %run.trail_id, "Run not advanced, trail locked");
                continue;
            }

            let (updated, update) = progression::advance_run(trail, run, cumulative, now)?;
            if updated != *run {
                *run = updated.clone();
                changed_runs.push(updated);
            }
            if update.cumulative_distance_meters != update.previous_distance_meters
                || update.completed_now
            {
                progress.push(update);
            }
        }

        let history = calendar::classify_history(&ledger, prefs.daily_goal_steps, now);
        let statuses: Vec<DayStatus> = history.iter().map(|d| d.status).collect();
        let streaks = streaks::summarize(&statuses);
        let badges_unlocked = self.unlocked_badges(user_id, &ledger, &runs, streaks, now)?;

        self.store.commit_activity(
            user_id,
            &ActivityWrite {
                entry: Some(entry.clone()),
                runs: changed_runs,
                badges: badges_unlocked.clone(),
            },
        )?;

        for update in &progress {
            self.log_progress(user_id, update, now);
        }
        for badge in &badges_unlocked {
            tracing::info!(user_id, badge_id = %badge.badge_id, "Badge unlocked");
        }

        Ok(ActivityOutcome {
            day_status: calendar::classify_day(&ledger, prefs.daily_goal_steps, entry.date, now),
            entry,
            progress,
            streaks,
            badges_unlocked,
        })
    }

    /// Start a run on a trail. Activity logged earlier today already counts,
    /// and landmarks it reaches are reported as arrivals of the start.
    pub async fn start_run(
        &self,
        user_id: &str,
        trail_id: &str,
        goal_days: u32,
        prefs: &Preferences,
        gate: &dyn EntitlementGate,
    ) -> Result<RunStarted> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;
        let now = self.clock.now();
        let today = now.date_naive();

        prefs.validate()?;
        let calculator = ProgressionCalculator::new(&self.trails, gate);
        let run = calculator.start_run(trail_id, goal_days, now)?;

        if self.store.load_trail_run(user_id, trail_id)?.is_some() {
            return Err(AppError::BadRequest(format!(
                "A run on trail {trail_id} already exists"
            )));
        }

        let ledger = self.store.load_ledger(user_id)?;
        let initial = ledger.cumulative_distance_between(run.start_date(), today);
        let (run, update) = calculator.advance(&run, initial, now)?;

        let mut runs = self.store.list_trail_runs(user_id)?;
        runs.push(run.clone());
        let statuses: Vec<DayStatus> =
            calendar::classify_history(&ledger, prefs.daily_goal_steps, now)
                .iter()
                .map(|d| d.status)
                .collect();
        let badges_unlocked =
            self.unlocked_badges(user_id, &ledger, &runs, streaks::summarize(&statuses), now)?;

        self.store.commit_activity(
            user_id,
            &ActivityWrite {
                entry: None,
                runs: vec![run.clone()],
                badges: badges_unlocked.clone(),
            },
        )?;
        tracing::info!(user_id, trail_id, goal_days, "Trail run started");
        self.log_progress(user_id, &update, now);
        for badge in &badges_unlocked {
            tracing::info!(user_id, badge_id = %badge.badge_id, "Badge unlocked");
        }

        Ok(RunStarted {
            run: calculator.snapshot(&run, today)?,
            arrivals: update.arrivals,
            completed_now: update.completed_now,
            badges_unlocked,
        })
    }

    /// Current view of a user's run. The trail must still be accessible.
    pub fn run_snapshot(
        &self,
        user_id: &str,
        trail_id: &str,
        gate: &dyn EntitlementGate,
    ) -> Result<RunSnapshot> {
        let run = self
            .store
            .load_trail_run(user_id, trail_id)?
            .ok_or_else(|| AppError::NotFound(format!("No run on trail {trail_id}")))?;
        let calculator = ProgressionCalculator::new(&self.trails, gate);
        Ok(calculator.snapshot(&run, self.clock.now().date_naive())?)
    }

    /// Calendar months in the current viewing window.
    pub fn calendar(&self, user_id: &str, prefs: &Preferences) -> Result<Vec<MonthCalendar>> {
        prefs.validate()?;
        let ledger = self.store.load_ledger(user_id)?;
        Ok(calendar::visible_calendar(
            &ledger,
            prefs.daily_goal_steps,
            self.clock.now(),
        )?)
    }

    /// Current and longest streaks over the whole ledger.
    pub fn streaks(&self, user_id: &str, prefs: &Preferences) -> Result<StreakSummary> {
        prefs.validate()?;
        let ledger = self.store.load_ledger(user_id)?;
        let statuses: Vec<DayStatus> =
            calendar::classify_history(&ledger, prefs.daily_goal_steps, self.clock.now())
                .iter()
                .map(|d| d.status)
                .collect();
        Ok(streaks::summarize(&statuses))
    }

    /// Lifetime ledger statistics.
    pub fn stats(&self, user_id: &str) -> Result<LedgerStats> {
        Ok(LedgerStats::from_ledger(&self.store.load_ledger(user_id)?))
    }

    pub fn earned_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>> {
        self.store.load_earned_badges(user_id)
    }

    /// Erase every record owned by the user.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let lock = self.user_lock(user_id);
        {
            let _guard = lock.lock().await;
            self.store.delete_user_data(user_id)?;
        }
        // Forget the lock unless another task is already waiting on it
        self.user_locks
            .remove_if(user_id, |_, l| Arc::ptr_eq(l, &lock) && Arc::strong_count(l) == 2);
        tracing::info!(user_id, "User data erased");
        Ok(())
    }

    /// Badges whose criteria hold for the given ledger and runs but are not
    /// yet earned.
    fn unlocked_badges(
        &self,
        user_id: &str,
        ledger: &ActivityLedger,
        runs: &[TrailRun],
        streaks: StreakSummary,
        now: DateTime<Utc>,
    ) -> Result<Vec<EarnedBadge>> {
        let stats = LedgerStats::from_ledger_through(ledger, now.date_naive());
        let trails_completed = runs.iter().filter(|r| r.is_completed()).count() as u32;
        let aggregates = build_aggregates(&stats, streaks, trails_completed);
        let earned = self.store.load_earned_badges(user_id)?;
        Ok(self.badges.newly_unlocked(&aggregates, &earned, now))
    }

    fn log_progress(&self, user_id: &str, update: &ProgressUpdate, now: DateTime<Utc>) {
        for arrival in &update.arrivals {
            tracing::info!(
                user_id,
                trail_id = %arrival.trail_id,
                landmark = %arrival.landmark.name,
                reached_at = %format_utc_rfc3339(arrival.reached_at),
                "Landmark reached"
            );
        }
        if update.completed_now {
            tracing::info!(
                user_id,
                trail_id = %update.trail_id,
                completed_at = %format_utc_rfc3339(now),
                "Trail completed"
            );
        }
    }
}
