// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! The engine only talks to `ActivityStore`; the storage technology behind it
//! is up to the deployment. `MemoryStore` is the bundled implementation.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{ActivityEntry, ActivityLedger, EarnedBadge, TrailRun};

/// Everything one ledger write changes, committed together.
#[derive(Debug, Clone, Default)]
pub struct ActivityWrite {
    pub entry: Option<ActivityEntry>,
    pub runs: Vec<TrailRun>,
    pub badges: Vec<EarnedBadge>,
}

/// Storage for a user's ledger, trail runs and earned badges.
pub trait ActivityStore: Send + Sync {
    /// Load the user's full ledger (empty for unknown users).
    fn load_ledger(&self, user_id: &str) -> Result<ActivityLedger, AppError>;

    /// Insert or replace one day's entry.
    fn save_ledger_entry(&self, user_id: &str, entry: &ActivityEntry) -> Result<(), AppError>;

    fn load_trail_run(&self, user_id: &str, trail_id: &str)
        -> Result<Option<TrailRun>, AppError>;

    fn list_trail_runs(&self, user_id: &str) -> Result<Vec<TrailRun>, AppError>;

    fn save_trail_run(&self, user_id: &str, run: &TrailRun) -> Result<(), AppError>;

    fn load_earned_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>, AppError>;

    fn save_earned_badge(&self, user_id: &str, badge: &EarnedBadge) -> Result<(), AppError>;

    /// Remove every record owned by the user (account erasure).
    fn delete_user_data(&self, user_id: &str) -> Result<(), AppError>;

    /// Apply a whole write. Stores with transactions should override this
    /// so the write lands all-or-nothing.
    fn commit_activity(&self, user_id: &str, write: &ActivityWrite) -> Result<(), AppError> {
        if let Some(entry) = &write.entry {
            self.save_ledger_entry(user_id, entry)?;
        }
        for run in &write.runs {
            self.save_trail_run(user_id, run)?;
        }
        for badge in &write.badges {
            self.save_earned_badge(user_id, badge)?;
        }
        Ok(())
    }
}
