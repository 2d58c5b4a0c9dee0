//! Pull request lifecycle: creation with automatic reviewers, merge, and
//! reviewer reassignment.

use super::{
    deactivation::ReviewerReassigner,
    error::{ReviewError, ReviewResult},
};
use crate::directory::{
    domain::{Team, UserId},
    ports::DirectoryRepository,
};
use crate::review::{
    domain::{PullRequest, PullRequestId, ReviewDomainError, ReviewStats, ReviewerSelector},
    ports::{Edit, PullRequestRepository, PullRequestRepositoryError},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    id: String,
    name: String,
    author_id: String,
}

impl CreatePullRequestRequest {
    /// Creates a request for the given identifier, name, and author.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
        }
    }
}

/// Result of a successful reviewer reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignOutcome {
    pull_request: PullRequest,
    replaced_by: UserId,
}

impl ReassignOutcome {
    /// Returns the updated pull request.
    #[must_use]
    pub const fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }

    /// Returns the reviewer that took over the vacated slot.
    #[must_use]
    pub const fn replaced_by(&self) -> &UserId {
        &self.replaced_by
    }
}

/// Pull request lifecycle orchestration service.
#[derive(Clone)]
pub struct PullRequestLifecycleService<D, P, C>
where
    D: DirectoryRepository,
    P: PullRequestRepository,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    pull_requests: Arc<P>,
    clock: Arc<C>,
    selector: ReviewerSelector,
}

impl<D, P, C> PullRequestLifecycleService<D, P, C>
where
    D: DirectoryRepository,
    P: PullRequestRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service with an entropy-seeded selector.
    #[must_use]
    pub fn new(directory: Arc<D>, pull_requests: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            directory,
            pull_requests,
            clock,
            selector: ReviewerSelector::new(),
        }
    }

    /// Replaces the reviewer selector.
    #[must_use]
    pub fn with_selector(mut self, selector: ReviewerSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Opens a pull request and assigns up to two active teammates of the
    /// author as reviewers.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::PullRequestExists`] when the identifier is
    /// taken, [`ReviewError::UserNotFound`] or [`ReviewError::TeamNotFound`]
    /// when the author cannot be resolved, and a validation error when an
    /// identifier or the name is blank.
    pub async fn create(&self, request: CreatePullRequestRequest) -> ReviewResult<PullRequest> {
        let CreatePullRequestRequest {
            id,
            name,
            author_id: raw_author_id,
        } = request;
        let pull_request_id = PullRequestId::new(id)?;
        let author_id = UserId::new(raw_author_id)?;
        if name.trim().is_empty() {
            return Err(ReviewDomainError::EmptyPullRequestName.into());
        }

        if self
            .pull_requests
            .find_by_id(&pull_request_id)
            .await?
            .is_some()
        {
            return Err(ReviewError::PullRequestExists(pull_request_id));
        }
        let author = self
            .directory
            .find_user(&author_id)
            .await?
            .ok_or_else(|| ReviewError::UserNotFound(author_id.clone()))?;
        let team = self
            .directory
            .find_team(author.team_name())
            .await?
            .ok_or_else(|| ReviewError::TeamNotFound(author.team_name().clone()))?;

        let pool = team.active_members_excluding(&[author.id()]);
        let reviewers = self.selector.pick_initial(&pool);
        let pull_request =
            PullRequest::open(pull_request_id, name, author_id, reviewers, &*self.clock)?;
        self.pull_requests
            .create(&pull_request)
            .await
            .map_err(|err| match err {
                PullRequestRepositoryError::DuplicatePullRequest(existing) => {
                    ReviewError::PullRequestExists(existing)
                }
                other => ReviewError::Repository(other),
            })?;

        info!(
            pull_request = %pull_request.id(),
            author = %pull_request.author_id(),
            reviewers = pull_request.assigned_reviewers().len(),
            candidates = pool.len(),
            "pull request created"
        );
        Ok(pull_request)
    }

    /// Marks a pull request merged.
    ///
    /// Merging an already merged pull request returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::PullRequestNotFound`] when the pull request
    /// does not exist.
    pub async fn merge(&self, pull_request_id: &str) -> ReviewResult<PullRequest> {
        let id = PullRequestId::new(pull_request_id)?;
        let merged_at = self.clock.utc();
        let lookup = id.clone();
        let (pull_request, changed) = self
            .pull_requests
            .edit(&id, move |current| -> ReviewResult<Edit<bool>> {
                let mut pull_request =
                    current.ok_or(ReviewError::PullRequestNotFound(lookup))?;
                if pull_request.merge(merged_at) {
                    Ok(Edit::Write(pull_request, true))
                } else {
                    Ok(Edit::Keep(pull_request, false))
                }
            })
            .await?;

        if changed {
            info!(pull_request = %pull_request.id(), "pull request merged");
        } else {
            debug!(pull_request = %pull_request.id(), "pull request already merged");
        }
        Ok(pull_request)
    }

    /// Replaces a reviewer with a random active teammate of that reviewer,
    /// keeping the vacated position.
    ///
    /// # Errors
    ///
    /// Checked in order: [`ReviewError::PullRequestNotFound`],
    /// [`ReviewError::PullRequestMerged`], [`ReviewError::NotAssigned`],
    /// [`ReviewError::UserNotFound`] or [`ReviewError::TeamNotFound`] for the
    /// departing reviewer, then [`ReviewError::NoCandidate`].
    pub async fn reassign(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> ReviewResult<ReassignOutcome> {
        let id = PullRequestId::new(pull_request_id)?;
        let departing = UserId::new(old_reviewer_id)?;
        self.reassign_parsed(id, departing).await
    }

    /// Returns every pull request the user reviews, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::UserNotFound`] when the user does not exist.
    pub async fn reviews_for_user(&self, user_id: &str) -> ReviewResult<Vec<PullRequest>> {
        let id = UserId::new(user_id)?;
        if self.directory.find_user(&id).await?.is_none() {
            return Err(ReviewError::UserNotFound(id));
        }
        Ok(self.pull_requests.find_by_reviewer(&id).await?)
    }

    /// Returns pull request counts per status and per reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Repository`] when storage fails.
    pub async fn stats(&self) -> ReviewResult<ReviewStats> {
        Ok(self.pull_requests.stats().await?)
    }

    async fn reassign_parsed(
        &self,
        id: PullRequestId,
        departing: UserId,
    ) -> ReviewResult<ReassignOutcome> {
        let departing_team = self.resolve_team_of(&departing).await?;
        let selector = self.selector.clone();
        let lookup = id.clone();
        let reviewer = departing.clone();

        let (pull_request, replaced_by) = self
            .pull_requests
            .edit(&id, move |current| -> ReviewResult<Edit<UserId>> {
                let mut pull_request =
                    current.ok_or(ReviewError::PullRequestNotFound(lookup))?;
                if pull_request.is_merged() {
                    return Err(ReviewError::PullRequestMerged(pull_request.id().clone()));
                }
                if !pull_request.has_reviewer(&reviewer) {
                    return Err(ReviewError::NotAssigned {
                        pull_request_id: pull_request.id().clone(),
                        reviewer_id: reviewer,
                    });
                }
                let team = departing_team?;

                let mut excluded: Vec<&UserId> =
                    pull_request.assigned_reviewers().iter().collect();
                excluded.push(pull_request.author_id());
                let pool = team.active_members_excluding(&excluded);
                let replacement =
                    selector
                        .pick_replacement(&pool)
                        .ok_or_else(|| ReviewError::NoCandidate {
                            pull_request_id: pull_request.id().clone(),
                            reviewer_id: reviewer.clone(),
                        })?;
                pull_request.replace_reviewer(&reviewer, replacement.clone())?;
                Ok(Edit::Write(pull_request, replacement))
            })
            .await?;

        info!(
            pull_request = %pull_request.id(),
            from = %departing,
            to = %replaced_by,
            "reviewer reassigned"
        );
        Ok(ReassignOutcome {
            pull_request,
            replaced_by,
        })
    }

    /// Looks up the team the user currently belongs to.
    ///
    /// Storage failures are returned in the outer result; an unknown user or
    /// team is returned in the inner one so it can be reported after the
    /// pull request checks.
    async fn resolve_team_of(&self, user_id: &UserId) -> ReviewResult<ReviewResult<Team>> {
        let Some(user) = self.directory.find_user(user_id).await? else {
            return Ok(Err(ReviewError::UserNotFound(user_id.clone())));
        };
        Ok(self
            .directory
            .find_team(user.team_name())
            .await?
            .ok_or_else(|| ReviewError::TeamNotFound(user.team_name().clone())))
    }
}

#[async_trait]
impl<D, P, C> ReviewerReassigner for PullRequestLifecycleService<D, P, C>
where
    D: DirectoryRepository,
    P: PullRequestRepository,
    C: Clock + Send + Sync,
{
    async fn reassign_reviewer(
        &self,
        pull_request_id: &PullRequestId,
        reviewer_id: &UserId,
    ) -> ReviewResult<UserId> {
        self.reassign_parsed(pull_request_id.clone(), reviewer_id.clone())
            .await
            .map(|outcome| outcome.replaced_by)
    }
}
