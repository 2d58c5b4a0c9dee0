//! `PostgreSQL` pull request adapter.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresPullRequestRepository;
