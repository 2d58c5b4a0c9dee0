//! Diesel row models for pull request persistence.

use super::schema::{pull_request_reviewers, pull_requests};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert model for pull request records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PullRequestRow {
    /// External pull request identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Author user identifier.
    pub author_id: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Changeset applied when a pull request is rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pull_requests)]
#[diesel(treat_none_as_null = true)]
pub struct PullRequestChangeset {
    /// Display name.
    pub name: String,
    /// Author user identifier.
    pub author_id: String,
    /// Lifecycle status.
    pub status: String,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Query and insert model for reviewer slots.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pull_request_reviewers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewerRow {
    /// Owning pull request.
    pub pull_request_id: String,
    /// Assigned reviewer.
    pub user_id: String,
    /// Zero-based slot.
    pub position: i16,
}

/// Raw query row pairing an open pull request with one reviewer.
#[derive(Debug, Clone, QueryableByName)]
pub struct AssignmentRow {
    /// Pull request identifier.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub pull_request_id: String,
    /// Reviewer identifier.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub user_id: String,
}
