//! Error types for review domain validation and parsing.

use super::PullRequestId;
use crate::directory::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing or mutating pull requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The pull request identifier is empty after trimming.
    #[error("pull request identifier must not be empty")]
    EmptyPullRequestId,

    /// The pull request name is empty after trimming.
    #[error("pull request name must not be empty")]
    EmptyPullRequestName,

    /// The author was listed as a reviewer.
    #[error("author {0} cannot review their own pull request")]
    ReviewerIsAuthor(UserId),

    /// The same reviewer appears twice.
    #[error("reviewer {0} is assigned more than once")]
    DuplicateReviewer(UserId),

    /// More reviewers than allowed were supplied.
    #[error("{0} reviewers exceed the limit of two")]
    TooManyReviewers(usize),

    /// A merged pull request cannot change reviewers.
    #[error("pull request {0} is already merged")]
    AlreadyMerged(PullRequestId),

    /// The user is not a reviewer of the pull request.
    #[error("user {reviewer_id} is not a reviewer of pull request {pull_request_id}")]
    ReviewerNotAssigned {
        /// Pull request being edited.
        pull_request_id: PullRequestId,
        /// User that was expected among the reviewers.
        reviewer_id: UserId,
    },

    /// The merge timestamp does not agree with the status.
    #[error("pull request {0} has a merge timestamp inconsistent with its status")]
    InconsistentMergeState(PullRequestId),
}

/// Error returned while parsing pull request statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pull request status: {0}")]
pub struct ParsePullRequestStatusError(pub String);
