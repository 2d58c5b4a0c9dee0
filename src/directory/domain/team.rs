//! Team aggregate and its member projection.

use super::{DirectoryDomainError, TeamName, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Projection of a user as seen through team membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    user_id: UserId,
    username: String,
    is_active: bool,
}

impl TeamMember {
    /// Creates a member projection.
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_active,
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the member's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns whether the member is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Expands the projection into a full user record of `team_name`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyUsername`] when the username is
    /// blank.
    pub fn to_user(&self, team_name: &TeamName) -> Result<User, DirectoryDomainError> {
        User::new(
            self.user_id.clone(),
            self.username.clone(),
            team_name.clone(),
            self.is_active,
        )
    }
}

impl From<&User> for TeamMember {
    fn from(user: &User) -> Self {
        Self::new(user.id().clone(), user.username(), user.is_active())
    }
}

/// A named team and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    name: TeamName,
    members: Vec<TeamMember>,
}

impl Team {
    /// Creates a team, rejecting duplicate member identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::DuplicateMember`] when a user appears
    /// more than once.
    pub fn new(name: TeamName, members: Vec<TeamMember>) -> Result<Self, DirectoryDomainError> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.user_id()) {
                return Err(DirectoryDomainError::DuplicateMember(
                    member.user_id().to_string(),
                ));
            }
        }
        Ok(Self { name, members })
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the members in listing order.
    #[must_use]
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Returns the active members whose identifiers are not in `excluded`.
    ///
    /// This is the candidate pool for reviewer selection.
    #[must_use]
    pub fn active_members_excluding(&self, excluded: &[&UserId]) -> Vec<UserId> {
        self.members
            .iter()
            .filter(|member| member.is_active())
            .filter(|member| !excluded.contains(&member.user_id()))
            .map(|member| member.user_id().clone())
            .collect()
    }
}
