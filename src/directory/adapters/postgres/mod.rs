//! `PostgreSQL` adapter for the team and user directory.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresDirectory;
