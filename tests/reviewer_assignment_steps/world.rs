//! Shared world state for reviewer assignment BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use reviewroster::directory::{adapters::memory::InMemoryDirectory, services::DirectoryService};
use reviewroster::review::{
    adapters::memory::InMemoryPullRequestRepository,
    domain::{PullRequest, ReviewerSelector},
    services::{
        DeactivationSummary, PullRequestLifecycleService, ReassignOutcome, ReviewError,
        TeamDeactivationService,
    },
};
use rstest::fixture;

/// Lifecycle service used by the BDD world.
pub type TestLifecycle =
    PullRequestLifecycleService<InMemoryDirectory, InMemoryPullRequestRepository, DefaultClock>;

/// Scenario world for reviewer assignment behaviour tests.
pub struct ReviewWorld {
    pub directory: DirectoryService<InMemoryDirectory>,
    pub lifecycle: Arc<TestLifecycle>,
    pub deactivation:
        TeamDeactivationService<InMemoryDirectory, InMemoryPullRequestRepository, TestLifecycle>,
    pub opened: HashMap<String, PullRequest>,
    pub last_reassign: Option<ReassignOutcome>,
    pub last_error: Option<ReviewError>,
    pub last_summary: Option<DeactivationSummary>,
}

impl ReviewWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryDirectory::new();
        let directory = Arc::new(store.clone());
        let pull_requests = Arc::new(InMemoryPullRequestRepository::new(store));
        let lifecycle = Arc::new(
            PullRequestLifecycleService::new(
                Arc::clone(&directory),
                Arc::clone(&pull_requests),
                Arc::new(DefaultClock),
            )
            .with_selector(ReviewerSelector::from_seed(11)),
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
            opened: HashMap::new(),
            last_reassign: None,
            last_error: None,
            last_summary: None,
        }
    }

    /// Returns the pull request as it was when opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario never opened `id`.
    pub fn opened(&self, id: &str) -> Result<&PullRequest, eyre::Report> {
        self.opened
            .get(id)
            .ok_or_else(|| eyre::eyre!("pull request {id} was not opened in this scenario"))
    }
}

impl Default for ReviewWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewWorld {
    ReviewWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated list of identifiers.
#[must_use]
pub fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}
