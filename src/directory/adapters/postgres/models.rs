//! Diesel row models for directory persistence.

use super::schema::{teams, users};
use diesel::prelude::*;

/// Insert model for team records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// Unique team name.
    pub team_name: String,
}

/// Query, insert, and upsert model for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Stable user identifier.
    pub user_id: String,
    /// Display username.
    pub username: String,
    /// Current team.
    pub team_name: String,
    /// Whether the user can be assigned reviews.
    pub is_active: bool,
}
