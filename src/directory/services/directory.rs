//! Service layer for team registration and user activity management.

use crate::directory::{
    domain::{DirectoryDomainError, Team, TeamMember, TeamName, User, UserId},
    ports::{DirectoryRepository, DirectoryRepositoryError},
};
use crate::error::ErrorCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering a team with its initial members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    team_name: String,
    members: Vec<(String, String, bool)>,
}

impl CreateTeamRequest {
    /// Creates a request for a team without members.
    #[must_use]
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member to the request.
    #[must_use]
    pub fn with_member(
        mut self,
        user_id: impl Into<String>,
        username: impl Into<String>,
        is_active: bool,
    ) -> Self {
        self.members.push((user_id.into(), username.into(), is_active));
        self
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),

    /// The team name is already registered.
    #[error("team already exists: {0}")]
    TeamExists(TeamName),

    /// The team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamName),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DirectoryRepositoryError),
}

impl DirectoryServiceError {
    /// Returns the caller-facing code, or `None` for storage failures.
    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Domain(_) => Some(ErrorCode::InvalidInput),
            Self::TeamExists(_) | Self::Repository(DirectoryRepositoryError::DuplicateTeam(_)) => {
                Some(ErrorCode::TeamExists)
            }
            Self::TeamNotFound(_)
            | Self::UserNotFound(_)
            | Self::Repository(DirectoryRepositoryError::UserNotFound(_)) => {
                Some(ErrorCode::NotFound)
            }
            Self::Repository(_) => None,
        }
    }
}

/// Result type for directory service operations.
pub type DirectoryServiceResult<T> = Result<T, DirectoryServiceError>;

/// Team and user directory service.
#[derive(Clone)]
pub struct DirectoryService<D>
where
    D: DirectoryRepository,
{
    repository: Arc<D>,
}

impl<D> DirectoryService<D>
where
    D: DirectoryRepository,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<D>) -> Self {
        Self { repository }
    }

    /// Registers a team and upserts its members as users of that team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::TeamExists`] when the name is taken,
    /// [`DirectoryServiceError::Domain`] when a field fails validation, or
    /// [`DirectoryServiceError::Repository`] when persistence fails.
    pub async fn create_team(&self, request: CreateTeamRequest) -> DirectoryServiceResult<Team> {
        let CreateTeamRequest {
            team_name,
            members: raw_members,
        } = request;
        let name = TeamName::new(team_name)?;
        let members = raw_members
            .into_iter()
            .map(|(user_id, username, is_active)| -> Result<_, DirectoryDomainError> {
                let member = TeamMember::new(UserId::new(user_id)?, username, is_active);
                member.to_user(&name)?;
                Ok(member)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let team = Team::new(name, members)?;

        if self.repository.find_team(team.name()).await?.is_some() {
            return Err(DirectoryServiceError::TeamExists(team.name().clone()));
        }
        self.repository
            .create_team(&team)
            .await
            .map_err(|err| match err {
                DirectoryRepositoryError::DuplicateTeam(name) => {
                    DirectoryServiceError::TeamExists(name)
                }
                other => DirectoryServiceError::Repository(other),
            })?;

        info!(
            team = %team.name(),
            members = team.members().len(),
            "team created"
        );
        Ok(team)
    }

    /// Returns a team with its current members.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::TeamNotFound`] when the team does not
    /// exist.
    pub async fn get_team(&self, team_name: &str) -> DirectoryServiceResult<Team> {
        let name = TeamName::new(team_name)?;
        self.repository
            .find_team(&name)
            .await?
            .ok_or(DirectoryServiceError::TeamNotFound(name))
    }

    /// Returns a user record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::UserNotFound`] when the user does not
    /// exist.
    pub async fn get_user(&self, user_id: &str) -> DirectoryServiceResult<User> {
        let id = UserId::new(user_id)?;
        self.repository
            .find_user(&id)
            .await?
            .ok_or(DirectoryServiceError::UserNotFound(id))
    }

    /// Sets whether a user may be assigned reviews.
    ///
    /// Existing assignments are left untouched; deactivating a single user
    /// does not trigger reassignment.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::UserNotFound`] when the user does not
    /// exist.
    pub async fn set_is_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> DirectoryServiceResult<User> {
        let id = UserId::new(user_id)?;
        let user = self
            .repository
            .set_user_active(&id, is_active)
            .await
            .map_err(|err| match err {
                DirectoryRepositoryError::UserNotFound(missing) => {
                    DirectoryServiceError::UserNotFound(missing)
                }
                other => DirectoryServiceError::Repository(other),
            })?;
        info!(user = %user.id(), is_active, "user activity updated");
        Ok(user)
    }
}
