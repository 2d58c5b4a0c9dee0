//! In-memory pull request adapter.

mod pull_request;

pub use pull_request::InMemoryPullRequestRepository;
