//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use reviewroster::directory::{
    adapters::memory::InMemoryDirectory,
    services::{CreateTeamRequest, DirectoryService},
};
use reviewroster::review::{
    adapters::memory::InMemoryPullRequestRepository,
    domain::ReviewerSelector,
    services::{PullRequestLifecycleService, TeamDeactivationService},
};
use rstest::fixture;

/// Lifecycle service over the in-memory adapters.
pub type Lifecycle =
    PullRequestLifecycleService<InMemoryDirectory, InMemoryPullRequestRepository, DefaultClock>;

/// Deactivation service driving the lifecycle service.
pub type Deactivation =
    TeamDeactivationService<InMemoryDirectory, InMemoryPullRequestRepository, Lifecycle>;

/// Every service wired over one shared set of in-memory stores.
pub struct App {
    pub directory: DirectoryService<InMemoryDirectory>,
    pub lifecycle: Arc<Lifecycle>,
    pub deactivation: Deactivation,
}

impl App {
    /// Builds the services with a reproducible reviewer selector.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let store = InMemoryDirectory::new();
        let directory = Arc::new(store.clone());
        let pull_requests = Arc::new(InMemoryPullRequestRepository::new(store));
        let lifecycle = Arc::new(
            PullRequestLifecycleService::new(
                Arc::clone(&directory),
                Arc::clone(&pull_requests),
                Arc::new(DefaultClock),
            )
            .with_selector(ReviewerSelector::from_seed(seed)),
        );
        let deactivation = TeamDeactivationService::new(
            Arc::clone(&directory),
            pull_requests,
            Arc::clone(&lifecycle),
        );
        Self {
            directory: DirectoryService::new(directory),
            lifecycle,
            deactivation,
        }
    }

    /// Registers a team whose members all start active.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory rejects the team.
    pub async fn add_team(&self, name: &str, members: &[&str]) -> Result<(), eyre::Report> {
        let request = members
            .iter()
            .fold(CreateTeamRequest::new(name), |request, id| {
                request.with_member(*id, format!("user {id}"), true)
            });
        self.directory.create_team(request).await?;
        Ok(())
    }
}

/// Provides an app seeded for reproducible reviewer choices.
#[fixture]
pub fn app() -> App {
    App::new(42)
}
