//! Pull request aggregate root and its review lifecycle.

use super::{ParsePullRequestStatusError, PullRequestId, ReviewDomainError};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum number of reviewers on a pull request.
pub const MAX_REVIEWERS: usize = 2;

/// Pull request lifecycle status.
///
/// The only transition is `Open` to `Merged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    /// Under review; reviewers may change.
    Open,
    /// Merged; reviewers and merge time are frozen.
    Merged,
}

impl PullRequestStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl TryFrom<&str> for PullRequestStatus {
    type Error = ParsePullRequestStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            _ => Err(ParsePullRequestStatusError(value.to_owned())),
        }
    }
}

/// Pull request aggregate root.
///
/// Invariants held by every constructor and mutation:
/// the author is never a reviewer, there are at most [`MAX_REVIEWERS`]
/// reviewers without duplicates, and a merged pull request never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    id: PullRequestId,
    name: String,
    author_id: UserId,
    status: PullRequestStatus,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    assigned_reviewers: Vec<UserId>,
}

/// Parameter object for reconstructing a persisted pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPullRequestData {
    /// Persisted identifier.
    pub id: PullRequestId,
    /// Persisted name.
    pub name: String,
    /// Persisted author.
    pub author_id: UserId,
    /// Persisted status.
    pub status: PullRequestStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted merge timestamp, if merged.
    pub merged_at: Option<DateTime<Utc>>,
    /// Persisted reviewers in assignment order.
    pub assigned_reviewers: Vec<UserId>,
}

impl PullRequest {
    /// Opens a new pull request with its initial reviewers.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError`] when the name is blank or the reviewer
    /// list breaks an invariant.
    pub fn open(
        id: PullRequestId,
        name: impl Into<String>,
        author_id: UserId,
        reviewers: Vec<UserId>,
        clock: &impl Clock,
    ) -> Result<Self, ReviewDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReviewDomainError::EmptyPullRequestName);
        }
        validate_reviewers(&author_id, &reviewers)?;

        Ok(Self {
            id,
            name: trimmed.to_owned(),
            author_id,
            status: PullRequestStatus::Open,
            created_at: clock.utc(),
            merged_at: None,
            assigned_reviewers: reviewers,
        })
    }

    /// Reconstructs a pull request from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError`] when the stored reviewers break an
    /// invariant or the merge timestamp disagrees with the status.
    pub fn from_persisted(data: PersistedPullRequestData) -> Result<Self, ReviewDomainError> {
        validate_reviewers(&data.author_id, &data.assigned_reviewers)?;
        let merged = data.status == PullRequestStatus::Merged;
        if merged != data.merged_at.is_some() {
            return Err(ReviewDomainError::InconsistentMergeState(data.id));
        }

        Ok(Self {
            id: data.id,
            name: data.name,
            author_id: data.author_id,
            status: data.status,
            created_at: data.created_at,
            merged_at: data.merged_at,
            assigned_reviewers: data.assigned_reviewers,
        })
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Returns the pull request name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// Returns whether the pull request has been merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self.status, PullRequestStatus::Merged)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the merge timestamp, if merged.
    #[must_use]
    pub const fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Returns the reviewers in assignment order.
    #[must_use]
    pub fn assigned_reviewers(&self) -> &[UserId] {
        &self.assigned_reviewers
    }

    /// Returns whether `user` is currently a reviewer.
    #[must_use]
    pub fn has_reviewer(&self, user: &UserId) -> bool {
        self.assigned_reviewers.contains(user)
    }

    /// Marks the pull request merged at `merged_at`.
    ///
    /// Returns `false` and leaves the record untouched when it is already
    /// merged.
    pub fn merge(&mut self, merged_at: DateTime<Utc>) -> bool {
        if self.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(merged_at);
        true
    }

    /// Swaps `departing` for `replacement`, keeping the reviewer's position.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::AlreadyMerged`] for merged pull requests,
    /// [`ReviewDomainError::ReviewerNotAssigned`] when `departing` is not a
    /// reviewer, and the reviewer invariant errors when `replacement` is the
    /// author or already assigned.
    pub fn replace_reviewer(
        &mut self,
        departing: &UserId,
        replacement: UserId,
    ) -> Result<(), ReviewDomainError> {
        if self.is_merged() {
            return Err(ReviewDomainError::AlreadyMerged(self.id.clone()));
        }
        if replacement == self.author_id {
            return Err(ReviewDomainError::ReviewerIsAuthor(replacement));
        }
        if self.has_reviewer(&replacement) {
            return Err(ReviewDomainError::DuplicateReviewer(replacement));
        }
        let slot = self
            .assigned_reviewers
            .iter_mut()
            .find(|reviewer| *reviewer == departing)
            .ok_or_else(|| ReviewDomainError::ReviewerNotAssigned {
                pull_request_id: self.id.clone(),
                reviewer_id: departing.clone(),
            })?;
        *slot = replacement;
        Ok(())
    }

    /// Returns the record with its creation timestamp set to `created_at`.
    #[must_use]
    pub(crate) const fn keeping_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

fn validate_reviewers(author_id: &UserId, reviewers: &[UserId]) -> Result<(), ReviewDomainError> {
    if reviewers.len() > MAX_REVIEWERS {
        return Err(ReviewDomainError::TooManyReviewers(reviewers.len()));
    }
    for (position, reviewer) in reviewers.iter().enumerate() {
        if reviewer == author_id {
            return Err(ReviewDomainError::ReviewerIsAuthor(reviewer.clone()));
        }
        if reviewers.iter().take(position).any(|earlier| earlier == reviewer) {
            return Err(ReviewDomainError::DuplicateReviewer(reviewer.clone()));
        }
    }
    Ok(())
}
