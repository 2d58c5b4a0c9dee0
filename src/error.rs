//! Client-facing error codes shared by every service in the crate.
//!
//! Each service error exposes a `code()` accessor returning one of these
//! values for recoverable rejections and `None` for opaque storage failures.
//! A transport layer maps each code to a distinct response status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, caller-visible classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A team with the requested name already exists.
    TeamExists,
    /// A pull request with the requested identifier already exists.
    PrExists,
    /// The pull request is merged and can no longer change reviewers.
    PrMerged,
    /// The user is not currently a reviewer of the pull request.
    NotAssigned,
    /// No active replacement reviewer is available.
    NoCandidate,
    /// A referenced user, team, or pull request does not exist.
    NotFound,
    /// An identifier or name failed validation.
    InvalidInput,
}

impl ErrorCode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TeamExists => "TEAM_EXISTS",
            Self::PrExists => "PR_EXISTS",
            Self::PrMerged => "PR_MERGED",
            Self::NotAssigned => "NOT_ASSIGNED",
            Self::NoCandidate => "NO_CANDIDATE",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
