//! Application services for the team and user directory.

mod directory;

pub use directory::{
    CreateTeamRequest, DirectoryService, DirectoryServiceError, DirectoryServiceResult,
};
