//! `PostgreSQL` repository implementation for pull requests.

use super::{
    models::{AssignmentRow, PullRequestChangeset, PullRequestRow, ReviewerRow},
    schema::{pull_request_reviewers, pull_requests},
};
use crate::directory::domain::{TeamName, UserId};
use crate::review::{
    domain::{
        PersistedPullRequestData, PullRequest, PullRequestId, PullRequestStatus, ReviewStats,
        ReviewerAssignment,
    },
    ports::{Edit, PullRequestRepository, PullRequestRepositoryError, PullRequestRepositoryResult},
};
use crate::storage::PgPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeMap, HashMap};

/// `PostgreSQL`-backed pull request repository.
#[derive(Debug, Clone)]
pub struct PostgresPullRequestRepository {
    pool: PgPool,
}

impl PostgresPullRequestRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> PullRequestRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PullRequestRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PullRequestRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PullRequestRepositoryError::persistence)?
    }
}

impl From<DieselError> for PullRequestRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Failure inside an edit transaction.
enum EditFailure<E> {
    Storage(PullRequestRepositoryError),
    Rejected(E),
}

impl<E> EditFailure<E> {
    fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(PullRequestRepositoryError::persistence(err))
    }
}

impl<E> From<DieselError> for EditFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Storage(err.into())
    }
}

#[async_trait]
impl PullRequestRepository for PostgresPullRequestRepository {
    async fn create(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()> {
        let row = to_row(pull_request);
        let reviewers = to_reviewer_rows(pull_request)?;
        let id = pull_request.id().clone();

        self.run(move |connection| {
            connection.transaction::<_, PullRequestRepositoryError, _>(|tx| {
                diesel::insert_into(pull_requests::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            PullRequestRepositoryError::DuplicatePullRequest(id.clone())
                        }
                        _ => PullRequestRepositoryError::persistence(err),
                    })?;
                insert_reviewers(tx, &reviewers)
            })
        })
        .await
    }

    async fn replace(&self, pull_request: &PullRequest) -> PullRequestRepositoryResult<()> {
        let updated = pull_request.clone();
        self.run(move |connection| {
            connection.transaction::<_, PullRequestRepositoryError, _>(|tx| {
                write_pull_request(tx, updated)?;
                Ok(())
            })
        })
        .await
    }

    async fn edit<F, T, E>(&self, id: &PullRequestId, decide: F) -> Result<(PullRequest, T), E>
    where
        F: FnOnce(Option<PullRequest>) -> Result<Edit<T>, E> + Send + 'static,
        T: Send + 'static,
        E: From<PullRequestRepositoryError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let lookup = id.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get().map_err(EditFailure::storage)?;
            let connection: &mut PgConnection = &mut pooled;
            connection.transaction::<_, EditFailure<E>, _>(|tx| {
                let current = lock_pull_request(tx, &lookup).map_err(EditFailure::Storage)?;
                match decide(current).map_err(EditFailure::Rejected)? {
                    Edit::Write(updated, value) => {
                        if updated.id() != &lookup {
                            return Err(EditFailure::Storage(
                                PullRequestRepositoryError::NotFound(updated.id().clone()),
                            ));
                        }
                        let stored =
                            write_pull_request(tx, updated).map_err(EditFailure::Storage)?;
                        Ok((stored, value))
                    }
                    Edit::Keep(kept, value) => Ok((kept, value)),
                }
            })
        })
        .await
        .unwrap_or_else(|err| Err(EditFailure::storage(err)));

        outcome.map_err(|failure| match failure {
            EditFailure::Storage(err) => E::from(err),
            EditFailure::Rejected(err) => err,
        })
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> PullRequestRepositoryResult<Option<PullRequest>> {
        let lookup = id.clone();
        self.run(move |connection| {
            let Some(row) = pull_requests::table
                .filter(pull_requests::id.eq(lookup.as_str()))
                .select(PullRequestRow::as_select())
                .get_result::<PullRequestRow>(connection)
                .optional()?
            else {
                return Ok(None);
            };
            let reviewers = load_reviewers(connection, &row.id)?;
            row_to_pull_request(row, reviewers).map(Some)
        })
        .await
    }

    async fn find_by_reviewer(
        &self,
        reviewer: &UserId,
    ) -> PullRequestRepositoryResult<Vec<PullRequest>> {
        let lookup = reviewer.clone();
        self.run(move |connection| {
            let ids = pull_request_reviewers::table
                .filter(pull_request_reviewers::user_id.eq(lookup.as_str()))
                .select(pull_request_reviewers::pull_request_id)
                .load::<String>(connection)?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let rows = pull_requests::table
                .filter(pull_requests::id.eq_any(ids.clone()))
                .order((pull_requests::created_at.asc(), pull_requests::id.asc()))
                .select(PullRequestRow::as_select())
                .load::<PullRequestRow>(connection)?;
            let mut slots: HashMap<String, Vec<String>> = HashMap::new();
            for slot in pull_request_reviewers::table
                .filter(pull_request_reviewers::pull_request_id.eq_any(ids))
                .order((
                    pull_request_reviewers::pull_request_id.asc(),
                    pull_request_reviewers::position.asc(),
                ))
                .select(ReviewerRow::as_select())
                .load::<ReviewerRow>(connection)?
            {
                slots
                    .entry(slot.pull_request_id)
                    .or_default()
                    .push(slot.user_id);
            }

            rows.into_iter()
                .map(|row| {
                    let reviewers = slots.remove(&row.id).unwrap_or_default();
                    row_to_pull_request(row, reviewers)
                })
                .collect()
        })
        .await
    }

    async fn open_assignments_for_team(
        &self,
        team: &TeamName,
    ) -> PullRequestRepositoryResult<Vec<ReviewerAssignment>> {
        let lookup = team.clone();
        self.run(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT r.pull_request_id, r.user_id FROM pull_request_reviewers r ",
                "JOIN pull_requests p ON p.id = r.pull_request_id ",
                "JOIN users u ON u.user_id = r.user_id ",
                "WHERE p.status = 'OPEN' AND u.team_name = $1 ",
                "ORDER BY p.created_at, r.pull_request_id, r.position",
            ))
            .bind::<diesel::sql_types::Text, _>(lookup.as_str())
            .load::<AssignmentRow>(connection)?;

            rows.into_iter()
                .map(|row| {
                    let pull_request_id = PullRequestId::new(row.pull_request_id)
                        .map_err(PullRequestRepositoryError::invalid_persisted_data)?;
                    let reviewer_id = UserId::new(row.user_id)
                        .map_err(PullRequestRepositoryError::invalid_persisted_data)?;
                    Ok(ReviewerAssignment::new(pull_request_id, reviewer_id))
                })
                .collect()
        })
        .await
    }

    async fn stats(&self) -> PullRequestRepositoryResult<ReviewStats> {
        self.run(|connection| {
            let status_counts = pull_requests::table
                .group_by(pull_requests::status)
                .select((pull_requests::status, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)?;
            let reviewer_counts = pull_request_reviewers::table
                .group_by(pull_request_reviewers::user_id)
                .select((pull_request_reviewers::user_id, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)?;

            let mut per_status = BTreeMap::new();
            for (status, total) in status_counts {
                let parsed = PullRequestStatus::try_from(status.as_str())
                    .map_err(PullRequestRepositoryError::invalid_persisted_data)?;
                per_status.insert(parsed, to_count(total)?);
            }
            let mut per_reviewer = BTreeMap::new();
            for (user_id, total) in reviewer_counts {
                let reviewer = UserId::new(user_id)
                    .map_err(PullRequestRepositoryError::invalid_persisted_data)?;
                per_reviewer.insert(reviewer, to_count(total)?);
            }
            Ok(ReviewStats::new(per_status, per_reviewer))
        })
        .await
    }
}

fn lock_pull_request(
    connection: &mut PgConnection,
    id: &PullRequestId,
) -> PullRequestRepositoryResult<Option<PullRequest>> {
    let Some(row) = pull_requests::table
        .filter(pull_requests::id.eq(id.as_str()))
        .select(PullRequestRow::as_select())
        .for_update()
        .get_result::<PullRequestRow>(connection)
        .optional()?
    else {
        return Ok(None);
    };
    let reviewers = load_reviewers(connection, &row.id)?;
    row_to_pull_request(row, reviewers).map(Some)
}

/// Rewrites the mutable columns and reviewer slots of an existing record
/// and returns it with the stored creation timestamp.
fn write_pull_request(
    connection: &mut PgConnection,
    pull_request: PullRequest,
) -> PullRequestRepositoryResult<PullRequest> {
    let id = pull_request.id().as_str();
    let changeset = PullRequestChangeset {
        name: pull_request.name().to_owned(),
        author_id: pull_request.author_id().as_str().to_owned(),
        status: pull_request.status().as_str().to_owned(),
        merged_at: pull_request.merged_at(),
    };
    let Some(created_at) = diesel::update(pull_requests::table.filter(pull_requests::id.eq(id)))
        .set(&changeset)
        .returning(pull_requests::created_at)
        .get_result::<DateTime<Utc>>(connection)
        .optional()?
    else {
        return Err(PullRequestRepositoryError::NotFound(
            pull_request.id().clone(),
        ));
    };

    diesel::delete(
        pull_request_reviewers::table.filter(pull_request_reviewers::pull_request_id.eq(id)),
    )
    .execute(connection)?;
    insert_reviewers(connection, &to_reviewer_rows(&pull_request)?)?;
    Ok(pull_request.keeping_created_at(created_at))
}

fn insert_reviewers(
    connection: &mut PgConnection,
    rows: &[ReviewerRow],
) -> PullRequestRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(pull_request_reviewers::table)
        .values(rows)
        .execute(connection)?;
    Ok(())
}

fn load_reviewers(
    connection: &mut PgConnection,
    pull_request_id: &str,
) -> PullRequestRepositoryResult<Vec<String>> {
    pull_request_reviewers::table
        .filter(pull_request_reviewers::pull_request_id.eq(pull_request_id))
        .order(pull_request_reviewers::position.asc())
        .select(pull_request_reviewers::user_id)
        .load::<String>(connection)
        .map_err(Into::into)
}

fn to_row(pull_request: &PullRequest) -> PullRequestRow {
    PullRequestRow {
        id: pull_request.id().as_str().to_owned(),
        name: pull_request.name().to_owned(),
        author_id: pull_request.author_id().as_str().to_owned(),
        status: pull_request.status().as_str().to_owned(),
        created_at: pull_request.created_at(),
        merged_at: pull_request.merged_at(),
    }
}

fn to_reviewer_rows(pull_request: &PullRequest) -> PullRequestRepositoryResult<Vec<ReviewerRow>> {
    pull_request
        .assigned_reviewers()
        .iter()
        .enumerate()
        .map(|(position, reviewer)| {
            Ok(ReviewerRow {
                pull_request_id: pull_request.id().as_str().to_owned(),
                user_id: reviewer.as_str().to_owned(),
                position: i16::try_from(position)
                    .map_err(PullRequestRepositoryError::invalid_persisted_data)?,
            })
        })
        .collect()
}

fn row_to_pull_request(
    row: PullRequestRow,
    reviewers: Vec<String>,
) -> PullRequestRepositoryResult<PullRequest> {
    let PullRequestRow {
        id,
        name,
        author_id,
        status,
        created_at,
        merged_at,
    } = row;
    let data = PersistedPullRequestData {
        id: PullRequestId::new(id).map_err(PullRequestRepositoryError::invalid_persisted_data)?,
        name,
        author_id: UserId::new(author_id)
            .map_err(PullRequestRepositoryError::invalid_persisted_data)?,
        status: PullRequestStatus::try_from(status.as_str())
            .map_err(PullRequestRepositoryError::invalid_persisted_data)?,
        created_at,
        merged_at,
        assigned_reviewers: reviewers
            .into_iter()
            .map(UserId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PullRequestRepositoryError::invalid_persisted_data)?,
    };
    PullRequest::from_persisted(data).map_err(PullRequestRepositoryError::invalid_persisted_data)
}

fn to_count(total: i64) -> PullRequestRepositoryResult<u64> {
    u64::try_from(total).map_err(PullRequestRepositoryError::invalid_persisted_data)
}
