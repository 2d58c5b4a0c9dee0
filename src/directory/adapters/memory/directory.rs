//! In-memory directory for tests and embedded use.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::{
    domain::{Team, TeamMember, TeamName, User, UserId},
    ports::{DirectoryRepository, DirectoryRepositoryError, DirectoryRepositoryResult},
};

/// Thread-safe in-memory directory.
///
/// Clones share state, so the same directory can back both the directory
/// services and the in-memory pull request store's team lookups.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    teams: BTreeSet<TeamName>,
    users: BTreeMap<UserId, User>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the team a user currently belongs to.
    ///
    /// Returns `Ok(None)` when the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn team_of_user(&self, id: &UserId) -> DirectoryRepositoryResult<Option<TeamName>> {
        let state = self.read()?;
        Ok(state.users.get(id).map(|user| user.team_name().clone()))
    }

    fn read(&self) -> DirectoryRepositoryResult<RwLockReadGuard<'_, InMemoryDirectoryState>> {
        self.state.read().map_err(|err| {
            DirectoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> DirectoryRepositoryResult<RwLockWriteGuard<'_, InMemoryDirectoryState>> {
        self.state.write().map_err(|err| {
            DirectoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn members_of(state: &InMemoryDirectoryState, name: &TeamName) -> Vec<TeamMember> {
    state
        .users
        .values()
        .filter(|user| user.team_name() == name)
        .map(TeamMember::from)
        .collect()
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn create_team(&self, team: &Team) -> DirectoryRepositoryResult<()> {
        let users = team
            .members()
            .iter()
            .map(|member| member.to_user(team.name()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(DirectoryRepositoryError::invalid_persisted_data)?;

        let mut state = self.write()?;
        if state.teams.contains(team.name()) {
            return Err(DirectoryRepositoryError::DuplicateTeam(team.name().clone()));
        }
        state.teams.insert(team.name().clone());
        for user in users {
            state.users.insert(user.id().clone(), user);
        }
        Ok(())
    }

    async fn find_team(&self, name: &TeamName) -> DirectoryRepositoryResult<Option<Team>> {
        let state = self.read()?;
        if !state.teams.contains(name) {
            return Ok(None);
        }
        let team = Team::new(name.clone(), members_of(&state, name))
            .map_err(DirectoryRepositoryError::invalid_persisted_data)?;
        Ok(Some(team))
    }

    async fn upsert_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let mut state = self.write()?;
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &UserId) -> DirectoryRepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.get(id).cloned())
    }

    async fn set_user_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> DirectoryRepositoryResult<User> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| DirectoryRepositoryError::UserNotFound(id.clone()))?;
        user.set_active(is_active);
        Ok(user.clone())
    }

    async fn deactivate_team_members(&self, team: &TeamName) -> DirectoryRepositoryResult<u64> {
        let mut state = self.write()?;
        let mut changed = 0_u64;
        for user in state
            .users
            .values_mut()
            .filter(|user| user.team_name() == team && user.is_active())
        {
            user.set_active(false);
            changed += 1;
        }
        Ok(changed)
    }
}
