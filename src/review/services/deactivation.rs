//! Team deactivation with best-effort reviewer reassignment.
//!
//! The open assignments held by the team are captured before any member is
//! deactivated. Each captured pair is then reassigned independently: a
//! rejected reassignment is recorded in the summary and never undoes the
//! deactivation. Only storage failures abort the run.

use super::error::ReviewResult;
use crate::directory::{
    domain::{TeamName, UserId},
    ports::DirectoryRepository,
};
use crate::error::ErrorCode;
use crate::review::{
    domain::{PullRequestId, ReviewerAssignment},
    ports::PullRequestRepository,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Capability to move one reviewer slot to another teammate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewerReassigner: Send + Sync {
    /// Reassigns `reviewer_id` on `pull_request_id` and returns the new
    /// reviewer.
    ///
    /// # Errors
    ///
    /// Returns the same errors as a direct reassignment request.
    async fn reassign_reviewer(
        &self,
        pull_request_id: &PullRequestId,
        reviewer_id: &UserId,
    ) -> ReviewResult<UserId>;
}

/// A captured assignment that could not be reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeFailure {
    assignment: ReviewerAssignment,
    code: ErrorCode,
}

impl CascadeFailure {
    /// Returns the assignment that was left in place.
    #[must_use]
    pub const fn assignment(&self) -> &ReviewerAssignment {
        &self.assignment
    }

    /// Returns why the reassignment was rejected.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

/// Outcome of deactivating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivationSummary {
    team_name: TeamName,
    deactivated_count: u64,
    reassigned_count: u64,
    failures: Vec<CascadeFailure>,
}

impl DeactivationSummary {
    /// Returns the deactivated team.
    #[must_use]
    pub const fn team_name(&self) -> &TeamName {
        &self.team_name
    }

    /// Returns how many previously active members were deactivated.
    #[must_use]
    pub const fn deactivated_count(&self) -> u64 {
        self.deactivated_count
    }

    /// Returns how many captured assignments were moved to a new reviewer.
    #[must_use]
    pub const fn reassigned_count(&self) -> u64 {
        self.reassigned_count
    }

    /// Returns the captured assignments that could not be moved.
    #[must_use]
    pub fn failures(&self) -> &[CascadeFailure] {
        &self.failures
    }
}

/// Team deactivation orchestration service.
#[derive(Clone)]
pub struct TeamDeactivationService<D, P, R>
where
    D: DirectoryRepository,
    P: PullRequestRepository,
    R: ReviewerReassigner,
{
    directory: Arc<D>,
    pull_requests: Arc<P>,
    reassigner: Arc<R>,
}

impl<D, P, R> TeamDeactivationService<D, P, R>
where
    D: DirectoryRepository,
    P: PullRequestRepository,
    R: ReviewerReassigner,
{
    /// Creates a new team deactivation service.
    #[must_use]
    pub const fn new(directory: Arc<D>, pull_requests: Arc<P>, reassigner: Arc<R>) -> Self {
        Self {
            directory,
            pull_requests,
            reassigner,
        }
    }

    /// Deactivates every active member of a team and reassigns the open
    /// reviews they held.
    ///
    /// An unknown team deactivates nobody and reports zero counts.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewError::DirectoryDomain`] for a blank team name
    /// and a storage error when the snapshot, the deactivation, or a
    /// reassignment fails in storage. Rejected reassignments are reported in
    /// [`DeactivationSummary::failures`] instead.
    pub async fn deactivate_team(&self, team_name: &str) -> ReviewResult<DeactivationSummary> {
        let team = TeamName::new(team_name)?;
        let snapshot = self.pull_requests.open_assignments_for_team(&team).await?;
        let deactivated_count = self.directory.deactivate_team_members(&team).await?;
        debug!(
            team = %team,
            deactivated = deactivated_count,
            assignments = snapshot.len(),
            "team members deactivated"
        );

        let mut reassigned_count = 0_u64;
        let mut failures = Vec::new();
        for assignment in snapshot {
            match self
                .reassigner
                .reassign_reviewer(assignment.pull_request_id(), assignment.reviewer_id())
                .await
            {
                Ok(replacement) => {
                    reassigned_count += 1;
                    debug!(
                        pull_request = %assignment.pull_request_id(),
                        from = %assignment.reviewer_id(),
                        to = %replacement,
                        "review moved off deactivated team"
                    );
                }
                Err(err) => {
                    let Some(code) = err.code() else {
                        return Err(err);
                    };
                    warn!(
                        pull_request = %assignment.pull_request_id(),
                        reviewer = %assignment.reviewer_id(),
                        %code,
                        error = %err,
                        "review left on deactivated reviewer"
                    );
                    failures.push(CascadeFailure { assignment, code });
                }
            }
        }

        info!(
            team = %team,
            deactivated = deactivated_count,
            reassigned = reassigned_count,
            failed = failures.len(),
            "team deactivated"
        );
        Ok(DeactivationSummary {
            team_name: team,
            deactivated_count,
            reassigned_count,
            failures,
        })
    }
}
