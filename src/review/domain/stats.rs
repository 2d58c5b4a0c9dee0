//! Reporting counters over pull requests and assignments.

use super::PullRequestStatus;
use crate::directory::domain::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pull request counts per status and assignment counts per reviewer.
///
/// Reviewer counts include merged pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    per_status: BTreeMap<PullRequestStatus, u64>,
    per_reviewer: BTreeMap<UserId, u64>,
}

impl ReviewStats {
    /// Creates a stats snapshot from precomputed counters.
    #[must_use]
    pub const fn new(
        per_status: BTreeMap<PullRequestStatus, u64>,
        per_reviewer: BTreeMap<UserId, u64>,
    ) -> Self {
        Self {
            per_status,
            per_reviewer,
        }
    }

    /// Returns the number of pull requests per status.
    #[must_use]
    pub const fn per_status(&self) -> &BTreeMap<PullRequestStatus, u64> {
        &self.per_status
    }

    /// Returns the number of assignments per reviewer.
    #[must_use]
    pub const fn per_reviewer(&self) -> &BTreeMap<UserId, u64> {
        &self.per_reviewer
    }

    /// Returns how many pull requests have `status`.
    #[must_use]
    pub fn count_for_status(&self, status: PullRequestStatus) -> u64 {
        self.per_status.get(&status).copied().unwrap_or_default()
    }

    /// Returns how many pull requests list `reviewer` as a reviewer.
    #[must_use]
    pub fn assignments_for(&self, reviewer: &UserId) -> u64 {
        self.per_reviewer.get(reviewer).copied().unwrap_or_default()
    }
}
