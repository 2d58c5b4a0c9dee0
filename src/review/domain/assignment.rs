//! Reviewer assignment pairs captured before a team deactivation.

use super::PullRequestId;
use crate::directory::domain::UserId;
use serde::{Deserialize, Serialize};

/// One reviewer currently assigned to one open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewerAssignment {
    pull_request_id: PullRequestId,
    reviewer_id: UserId,
}

impl ReviewerAssignment {
    /// Creates an assignment pair.
    #[must_use]
    pub const fn new(pull_request_id: PullRequestId, reviewer_id: UserId) -> Self {
        Self {
            pull_request_id,
            reviewer_id,
        }
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn pull_request_id(&self) -> &PullRequestId {
        &self.pull_request_id
    }

    /// Returns the assigned reviewer.
    #[must_use]
    pub const fn reviewer_id(&self) -> &UserId {
        &self.reviewer_id
    }
}
