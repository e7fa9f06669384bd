// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store backed by a concurrent map, one record per user.

use crate::db::{ActivityStore, ActivityWrite};
use crate::error::AppError;
use crate::models::{ActivityEntry, ActivityLedger, EarnedBadge, TrailRun};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything stored for one user.
#[derive(Debug, Clone, Default)]
struct UserRecord {
    ledger: ActivityLedger,
    /// Runs keyed by trail id
    runs: BTreeMap<String, TrailRun>,
    badges: Vec<EarnedBadge>,
}

impl UserRecord {
    fn put_badge(&mut self, badge: &EarnedBadge) {
        // Earned badges are never replaced or revoked
        if !self.badges.iter().any(|b| b.badge_id == badge.badge_id) {
            self.badges.push(badge.clone());
        }
    }
}

/// Shared in-memory store. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with stored data.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl ActivityStore for MemoryStore {
    fn load_ledger(&self, user_id: &str) -> Result<ActivityLedger, AppError> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| u.ledger.clone())
            .unwrap_or_default())
    }

    fn save_ledger_entry(&self, user_id: &str, entry: &ActivityEntry) -> Result<(), AppError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .ledger
            .insert(entry.clone());
        Ok(())
    }

    fn load_trail_run(
        &self,
        user_id: &str,
        trail_id: &str,
    ) -> Result<Option<TrailRun>, AppError> {
        Ok(self
            .users
            .get(user_id)
            .and_then(|u| u.runs.get(trail_id).cloned()))
    }

    fn list_trail_runs(&self, user_id: &str) -> Result<Vec<TrailRun>, AppError> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| u.runs.values().cloned().collect())
            .unwrap_or_default())
    }

    fn save_trail_run(&self, user_id: &str, run: &TrailRun) -> Result<(), AppError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .runs
            .insert(run.trail_id.clone(), run.clone());
        Ok(())
    }

    fn load_earned_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>, AppError> {
        Ok(self
            .users
            .get(user_id)
            .map(|u| u.badges.clone())
            .unwrap_or_default())
    }

    fn save_earned_badge(&self, user_id: &str, badge: &EarnedBadge) -> Result<(), AppError> {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .put_badge(badge);
        Ok(())
    }

    fn delete_user_data(&self, user_id: &str) -> Result<(), AppError> {
        self.users.remove(user_id);
        tracing::info!(user_id, "Deleted user data");
        Ok(())
    }

    /// Applies the write while holding the user's map shard lock.
    fn commit_activity(&self, user_id: &str, write: &ActivityWrite) -> Result<(), AppError> {
        let mut record = self.users.entry(user_id.to_string()).or_default();
        if let Some(entry) = &write.entry {
            record.ledger.insert(entry.clone());
        }
        for run in &write.runs {
            record.runs.insert(run.trail_id.clone(), run.clone());
        }
        for badge in &write.badges {
            record.put_badge(badge);
        }
        Ok(())
    }
}
