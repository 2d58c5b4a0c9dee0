//! In-memory pull request repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::adapters::memory::InMemoryDirectory;
use crate::directory::domain::{TeamName, UserId};
use crate::review::{
    domain::{PullRequest, PullRequestId, PullRequestStatus, ReviewStats, ReviewerAssignment},
    ports::{Edit, PullRequestRepository, PullRequestRepositoryError, PullRequestRepositoryResult},
};

/// Thread-safe in-memory pull request repository.
///
/// Team membership of reviewers is resolved through the directory it was
/// created with.
#[derive(Debug, Clone)]
pub struct InMemoryPullRequestRepository {
    directory: InMemoryDirectory,
    state: Arc<RwLock<BTreeMap<PullRequestId, PullRequest>>>,
}

impl InMemoryPullRequestRepository {
    /// Creates an empty repository resolving teams through `directory`.
    #[must_use]
    pub fn new(directory: InMemoryDirectory) -> Self {
        Self {
            directory,
            state: Arc::default(),
        }
    }

    fn read(
        &self,
    ) -> PullRequestRepositoryResult<RwLockReadGuard<'_, BTreeMap<PullRequestId, PullRequest>>>
    {
        self.state.read().map_err(|err| {
            PullRequestRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> PullRequestRepositoryResult<RwLockWriteGuard<'_, BTreeMap<PullRequestId, PullRequest>>>
    {
        self.state.write().map_err(|err| {
            PullRequestRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Stores `updated` over an existing record, keeping its creation time, and
/// returns the record as stored.
fn overwrite(
    state: &mut BTreeMap<PullRequestId, PullRequest>,
    updated: PullRequest,
) -> PullRequestRepositoryResult<PullRequest> {
    let slot = state
        .get_mut(updated.id())
        .ok_or_else(|| PullRequestRepositoryError::NotFound(updated.id().clone()))?;
    let stored = updated.keeping_created_at(slot.created_at());
    slot.clone_from(&stored);
    Ok(stored)
}

#[async_trait]
impl PullRequestRepository for InMemoryPullRequestRepository {
    async fn create(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()> {
        let mut state = self.write()?;
        if state.contains_key(pull_request.id()) {
            return Err(PullRequestRepositoryError::DuplicatePullRequest(
                pull_request.id().clone(),
            ));
        }
        state.insert(pull_request.id().clone(), pull_request.clone());
        Ok(())
    }

    async fn replace(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()> {
        let mut state = self.write()?;
        overwrite(&mut state, pull_request.clone())?;
        Ok(())
    }

    async fn edit<F, T, E>(&self, id: &PullRequestId, decide: F) -> Result<(PullRequest, T), E>
    where
        F: FnOnce(Option<PullRequest>) -> Result<Edit<T>, E> + Send + 'static,
        T: Send + 'static,
        E: From<PullRequestRepositoryError> + Send + 'static,
    {
        let mut state = self.write()?;
        let current = state.get(id).cloned();
        match decide(current)? {
            Edit::Write(updated, value) => {
                if updated.id() != id {
                    return Err(PullRequestRepositoryError::NotFound(updated.id().clone()).into());
                }
                let stored = overwrite(&mut state, updated)?;
                Ok((stored, value))
            }
            Edit::Keep(kept, value) => Ok((kept, value)),
        }
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> PullRequestRepositoryResult<Option<PullRequest>> {
        let state = self.read()?;
        Ok(state.get(id).cloned())
    }

    async fn find_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> PullRequestRepositoryResult<Vec<PullRequest>> {
        let state = self.read()?;
        let mut found: Vec<PullRequest> = state
            .values()
            .filter(|pull_request| pull_request.has_reviewer(reviewer))
            .cloned()
            .collect();
        found.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(found)
    }

    async fn open_assignments_for_team(
        &self,
        team: &TeamName,
    ) -> PullRequestRepositoryResult<Vec<ReviewerAssignment>> {
        let state = self.read()?;
        let mut teams: HashMap<UserId, Option<TeamName>> = HashMap::new();
        let mut assignments = Vec::new();
        for pull_request in state.values().filter(|pull_request| !pull_request.is_merged()) {
            for reviewer in pull_request.assigned_reviewers() {
                if !teams.contains_key(reviewer) {
                    let resolved = self
                        .directory
                        .team_of_user(reviewer)
                        .map_err(PullRequestRepositoryError::persistence)?;
                    teams.insert(reviewer.clone(), resolved);
                }
                if teams.get(reviewer).and_then(Option::as_ref) == Some(team) {
                    assignments.push(ReviewerAssignment::new(
                        pull_request.id().clone(),
                        reviewer.clone(),
                    ));
                }
            }
        }
        Ok(assignments)
    }

    async fn stats(&self) -> PullRequestRepositoryResult<ReviewStats> {
        let state = self.read()?;
        let mut per_status: BTreeMap<PullRequestStatus, u64> = BTreeMap::new();
        let mut per_reviewer: BTreeMap<UserId, u64> = BTreeMap::new();
        for pull_request in state.values() {
            *per_status.entry(pull_request.status()).or_default() += 1;
            for reviewer in pull_request.assigned_reviewers() {
                *per_reviewer.entry(reviewer.clone()).or_default() += 1;
            }
        }
        Ok(ReviewStats::new(per_status, per_reviewer))
    }
}
