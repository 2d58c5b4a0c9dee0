//! Directory user record.

use super::{DirectoryDomainError, TeamName, UserId};
use serde::{Deserialize, Serialize};

/// A developer known to the directory.
///
/// Only current state is kept; there is no membership history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    team_name: TeamName,
    is_active: bool,
}

impl User {
    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyUsername`] when the username is
    /// empty after trimming.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        team_name: TeamName,
        is_active: bool,
    ) -> Result<Self, DirectoryDomainError> {
        let raw = username.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyUsername);
        }
        Ok(Self {
            id,
            username: trimmed.to_owned(),
            team_name,
            is_active,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the team the user currently belongs to.
    #[must_use]
    pub const fn team_name(&self) -> &TeamName {
        &self.team_name
    }

    /// Returns whether the user can currently be assigned reviews.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the activity flag.
    pub const fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}
