//! Domain model for the team and user directory.
//!
//! Users belong to exactly one team at a time. Team membership changes are
//! expressed as user upserts rather than team mutations.

mod error;
mod ids;
mod team;
mod user;

pub use error::DirectoryDomainError;
pub use ids::{TeamName, UserId};
pub use team::{Team, TeamMember};
pub use user::User;
