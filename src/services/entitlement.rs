// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail access checks (free tier allowlist vs. premium).

use crate::services::TrailService;
use std::collections::HashSet;

/// Decides whether the current user may walk a trail.
pub trait EntitlementGate: Send + Sync {
    fn can_access(&self, trail_id: &str) -> bool;
}

/// Free users get the allowlisted trails; premium users get everything.
#[derive(Debug, Clone, Default)]
pub struct FreeTierAllowlist {
    free_trail_ids: HashSet<String>,
    premium: bool,
}

impl FreeTierAllowlist {
    pub fn new<I, S>(free_trail_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            free_trail_ids: free_trail_ids.into_iter().map(Into::into).collect(),
            premium: false,
        }
    }

    /// Allowlist every catalog trail not flagged premium.
    pub fn from_catalog(trails: &TrailService) -> Self {
        Self::new(
            trails
                .trails()
                .iter()
                .filter(|t| !t.premium)
                .map(|t| t.id.clone()),
        )
    }

    /// Same allowlist, evaluated for a premium or free account.
    pub fn for_account(&self, premium: bool) -> Self {
        Self {
            free_trail_ids: self.free_trail_ids.clone(),
            premium,
        }
    }
}

impl EntitlementGate for FreeTierAllowlist {
    fn can_access(&self, trail_id: &str) -> bool {
        self.premium || self.free_trail_ids.contains(trail_id)
    }
}
