//! Domain model for pull request review assignment.
//!
//! Everything here is free of I/O. Reviewer selection lives in
//! [`selection`] so it can be tested against fixed candidate pools.

mod assignment;
mod error;
mod ids;
mod pull_request;
pub mod selection;
mod stats;

pub use assignment::ReviewerAssignment;
pub use error::{ParsePullRequestStatusError, ReviewDomainError};
pub use ids::PullRequestId;
pub use pull_request::{MAX_REVIEWERS, PersistedPullRequestData, PullRequest, PullRequestStatus};
pub use selection::ReviewerSelector;
pub use stats::ReviewStats;
