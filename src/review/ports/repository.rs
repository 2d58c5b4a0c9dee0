//! Repository port for pull request persistence and reviewer lookups.

use crate::directory::domain::{TeamName, UserId};
use crate::review::domain::{PullRequest, PullRequestId, ReviewStats, ReviewerAssignment};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pull request repository operations.
pub type PullRequestRepositoryResult<T> = Result<T, PullRequestRepositoryError>;

/// Decision returned by the callback passed to
/// [`PullRequestRepository::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    /// Persist the modified pull request and hand `T` back to the caller.
    Write(PullRequest, T),
    /// Leave the stored record untouched and hand `T` back to the caller.
    Keep(PullRequest, T),
}

/// Pull request persistence contract.
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Stores a new pull request with its reviewer list.
    ///
    /// # Errors
    ///
    /// Returns [`PullRequestRepositoryError::DuplicatePullRequest`] when the
    /// identifier already exists.
    async fn create(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()>;

    /// Replaces a stored pull request, including its reviewer list.
    ///
    /// The creation timestamp is never rewritten: a record carrying a
    /// different `created_at` is stored with the original one kept. The same
    /// rule applies to [`Edit::Write`] in [`Self::edit`], which hands back
    /// the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`PullRequestRepositoryError::NotFound`] when the pull request
    /// does not exist.
    async fn replace(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()>;

    /// Runs a read-decide-write cycle on one pull request atomically.
    ///
    /// `decide` receives the current record (or `None` when it does not
    /// exist) while concurrent edits of the same pull request are held off.
    /// Returning [`Edit::Write`] persists the new record before the hold is
    /// released; returning an error leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns the callback's error unchanged, or a converted
    /// [`PullRequestRepositoryError`] when storage fails or a write targets a
    /// missing record.
    async fn edit<F, T, E>(&self, id: &PullRequestId, decide: F) -> Result<(PullRequest, T), E>
    where
        F: FnOnce(Option<PullRequest>) -> Result<Edit<T>, E> + Send + 'static,
        T: Send + 'static,
        E: From<PullRequestRepositoryError> + Send + 'static;

    /// Finds a pull request by identifier.
    ///
    /// Returns `None` when the pull request does not exist.
    async fn find_by_id(&self, id: &PullRequestId)
    -> PullRequestRepositoryResult<Option<PullRequest>>;

    /// Returns every pull request listing `reviewer` as a reviewer, oldest
    /// first, regardless of status.
    async fn find_by_reviewer(&self, reviewer: &UserId)
    -> PullRequestRepositoryResult<Vec<PullRequest>>;

    /// Returns one pair per open pull request and reviewer where the
    /// reviewer currently belongs to `team`.
    async fn open_assignments_for_team(
        &self,
        team: &TeamName,
    ) -> PullRequestRepositoryResult<Vec<ReviewerAssignment>>;

    /// Returns pull request counts per status and per reviewer.
    async fn stats(&self) -> PullRequestRepositoryResult<ReviewStats>;
}

/// Errors returned by pull request repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PullRequestRepositoryError {
    /// A pull request with the same identifier already exists.
    #[error("duplicate pull request identifier: {0}")]
    DuplicatePullRequest(PullRequestId),

    /// The pull request was not found.
    #[error("pull request not found: {0}")]
    NotFound(PullRequestId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PullRequestRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
