//! Error types for directory domain validation.

use thiserror::Error;

/// Errors returned while constructing directory values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The user identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The same user appears twice in one team payload.
    #[error("user {0} is listed more than once in the team")]
    DuplicateMember(String),
}
