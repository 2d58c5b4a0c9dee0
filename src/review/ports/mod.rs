//! Port contracts for pull request review assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.

pub mod repository;

pub use repository::{Edit, PullRequestRepository, PullRequestRepositoryError, PullRequestRepositoryResult};
