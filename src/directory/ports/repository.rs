//! Repository port for team and user persistence.

use crate::directory::domain::{Team, TeamName, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory repository operations.
pub type DirectoryRepositoryResult<T> = Result<T, DirectoryRepositoryError>;

/// Team and user persistence contract.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Stores a new team and upserts every member as a user of that team.
    ///
    /// Members already known under another team are moved to this one.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateTeam`] when the team name
    /// is already taken.
    async fn create_team(&self, team: &Team) -> DirectoryRepositoryResult<()>;

    /// Finds a team with its current members ordered by user identifier.
    ///
    /// Returns `None` when the team does not exist.
    async fn find_team(&self, name: &TeamName) -> DirectoryRepositoryResult<Option<Team>>;

    /// Inserts or fully replaces a user record.
    async fn upsert_user(&self, user: &User) -> DirectoryRepositoryResult<()>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_user(&self, id: &UserId) -> DirectoryRepositoryResult<Option<User>>;

    /// Sets the activity flag of a user and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn set_user_active(&self, id: &UserId, is_active: bool)
    -> DirectoryRepositoryResult<User>;

    /// Marks every currently active member of `team` inactive.
    ///
    /// Returns the number of users whose flag changed. An unknown team
    /// changes nothing.
    async fn deactivate_team_members(&self, team: &TeamName) -> DirectoryRepositoryResult<u64>;
}

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryRepositoryError {
    /// A team with the same name already exists.
    #[error("duplicate team name: {0}")]
    DuplicateTeam(TeamName),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
