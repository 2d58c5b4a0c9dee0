//! Error type shared by the review services.

use crate::directory::{
    domain::{DirectoryDomainError, TeamName, UserId},
    ports::DirectoryRepositoryError,
};
use crate::error::ErrorCode;
use crate::review::{
    domain::{PullRequestId, ReviewDomainError},
    ports::PullRequestRepositoryError,
};
use thiserror::Error;

/// Service-level errors for pull request lifecycle and team deactivation.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Pull request validation failed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),

    /// A user or team identifier failed validation.
    #[error(transparent)]
    DirectoryDomain(#[from] DirectoryDomainError),

    /// A pull request with the same identifier already exists.
    #[error("pull request already exists: {0}")]
    PullRequestExists(PullRequestId),

    /// The pull request does not exist.
    #[error("pull request not found: {0}")]
    PullRequestNotFound(PullRequestId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamName),

    /// The pull request is merged and its reviewers are frozen.
    #[error("pull request {0} is merged")]
    PullRequestMerged(PullRequestId),

    /// The user is not a reviewer of the pull request.
    #[error("user {reviewer_id} is not a reviewer of pull request {pull_request_id}")]
    NotAssigned {
        /// Pull request being edited.
        pull_request_id: PullRequestId,
        /// User expected among the reviewers.
        reviewer_id: UserId,
    },

    /// No active teammate can replace the reviewer.
    #[error("no replacement candidate for {reviewer_id} on pull request {pull_request_id}")]
    NoCandidate {
        /// Pull request being edited.
        pull_request_id: PullRequestId,
        /// Reviewer that could not be replaced.
        reviewer_id: UserId,
    },

    /// Directory storage failed.
    #[error(transparent)]
    Directory(#[from] DirectoryRepositoryError),

    /// Pull request storage failed.
    #[error(transparent)]
    Repository(#[from] PullRequestRepositoryError),
}

impl ReviewError {
    /// Returns the caller-facing code, or `None` for storage failures.
    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Domain(ReviewDomainError::AlreadyMerged(_)) | Self::PullRequestMerged(_) => {
                Some(ErrorCode::PrMerged)
            }
            Self::Domain(ReviewDomainError::ReviewerNotAssigned { .. })
            | Self::NotAssigned { .. } => Some(ErrorCode::NotAssigned),
            Self::Domain(ReviewDomainError::InconsistentMergeState(_))
            | Self::Directory(
                DirectoryRepositoryError::InvalidPersistedData(_)
                | DirectoryRepositoryError::Persistence(_),
            )
            | Self::Repository(
                PullRequestRepositoryError::InvalidPersistedData(_)
                | PullRequestRepositoryError::Persistence(_),
            ) => None,
            Self::Domain(_) | Self::DirectoryDomain(_) => Some(ErrorCode::InvalidInput),
            Self::PullRequestExists(_)
            | Self::Repository(PullRequestRepositoryError::DuplicatePullRequest(_)) => {
                Some(ErrorCode::PrExists)
            }
            Self::Directory(DirectoryRepositoryError::DuplicateTeam(_)) => {
                Some(ErrorCode::TeamExists)
            }
            Self::PullRequestNotFound(_)
            | Self::UserNotFound(_)
            | Self::TeamNotFound(_)
            | Self::Directory(DirectoryRepositoryError::UserNotFound(_))
            | Self::Repository(PullRequestRepositoryError::NotFound(_)) => {
                Some(ErrorCode::NotFound)
            }
            Self::NoCandidate { .. } => Some(ErrorCode::NoCandidate),
        }
    }
}

/// Result type for review service operations.
pub type ReviewResult<T> = Result<T, ReviewError>;
