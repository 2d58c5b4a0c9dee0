//! Application services for pull request review assignment.

mod deactivation;
mod error;
mod lifecycle;

#[cfg(test)]
pub use deactivation::MockReviewerReassigner;
pub use deactivation::{
    CascadeFailure, DeactivationSummary, ReviewerReassigner, TeamDeactivationService,
};
pub use error::{ReviewError, ReviewResult};
pub use lifecycle::{CreatePullRequestRequest, PullRequestLifecycleService, ReassignOutcome};
