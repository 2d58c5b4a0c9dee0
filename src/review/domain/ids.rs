//! Identifier types for the review domain.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied pull request identifier, never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(String);

impl PullRequestId {
    /// Creates a validated pull request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyPullRequestId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReviewDomainError::EmptyPullRequestId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PullRequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
