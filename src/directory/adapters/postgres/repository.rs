//! `PostgreSQL` repository implementation for the directory.

use super::{
    models::{NewTeamRow, UserRow},
    schema::{teams, users},
};
use crate::directory::{
    domain::{Team, TeamMember, TeamName, User, UserId},
    ports::{DirectoryRepository, DirectoryRepositoryError, DirectoryRepositoryResult},
};
use crate::storage::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL`-backed directory.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> DirectoryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DirectoryRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DirectoryRepositoryError::persistence)?
    }
}

impl From<DieselError> for DirectoryRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectory {
    async fn create_team(&self, team: &Team) -> DirectoryRepositoryResult<()> {
        let name = team.name().clone();
        let team_row = NewTeamRow {
            team_name: name.as_str().to_owned(),
        };
        let user_rows = team
            .members()
            .iter()
            .map(|member| member.to_user(&name).map(|user| user_to_row(&user)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(DirectoryRepositoryError::invalid_persisted_data)?;

        self.run(move |connection| {
            connection.transaction::<_, DirectoryRepositoryError, _>(|tx| {
                diesel::insert_into(teams::table)
                    .values(&team_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            DirectoryRepositoryError::DuplicateTeam(name.clone())
                        }
                        _ => DirectoryRepositoryError::persistence(err),
                    })?;
                for row in &user_rows {
                    upsert_user_row(tx, row)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_team(&self, name: &TeamName) -> DirectoryRepositoryResult<Option<Team>> {
        let lookup = name.clone();
        self.run(move |connection| {
            let known: i64 = teams::table
                .filter(teams::team_name.eq(lookup.as_str()))
                .count()
                .get_result(connection)?;
            if known == 0 {
                return Ok(None);
            }

            let members = users::table
                .filter(users::team_name.eq(lookup.as_str()))
                .order(users::user_id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?
                .into_iter()
                .map(row_to_member)
                .collect::<DirectoryRepositoryResult<Vec<_>>>()?;

            Team::new(lookup, members)
                .map(Some)
                .map_err(DirectoryRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn upsert_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let row = user_to_row(user);
        self.run(move |connection| upsert_user_row(connection, &row))
            .await
    }

    async fn find_user(&self, id: &UserId) -> DirectoryRepositoryResult<Option<User>> {
        let lookup = id.clone();
        self.run(move |connection| {
            users::table
                .filter(users::user_id.eq(lookup.as_str()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?
                .map(row_to_user)
                .transpose()
        })
        .await
    }

    async fn set_user_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> DirectoryRepositoryResult<User> {
        let lookup = id.clone();
        self.run(move |connection| {
            let row = diesel::update(users::table.filter(users::user_id.eq(lookup.as_str())))
                .set(users::is_active.eq(is_active))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .optional()?
                .ok_or_else(|| DirectoryRepositoryError::UserNotFound(lookup.clone()))?;
            row_to_user(row)
        })
        .await
    }

    async fn deactivate_team_members(&self, team: &TeamName) -> DirectoryRepositoryResult<u64> {
        let lookup = team.clone();
        self.run(move |connection| {
            let changed = diesel::update(
                users::table
                    .filter(users::team_name.eq(lookup.as_str()))
                    .filter(users::is_active.eq(true)),
            )
            .set(users::is_active.eq(false))
            .execute(connection)?;
            u64::try_from(changed).map_err(DirectoryRepositoryError::persistence)
        })
        .await
    }
}

fn upsert_user_row(connection: &mut PgConnection, row: &UserRow) -> DirectoryRepositoryResult<()> {
    diesel::insert_into(users::table)
        .values(row)
        .on_conflict(users::user_id)
        .do_update()
        .set((
            users::username.eq(excluded(users::username)),
            users::team_name.eq(excluded(users::team_name)),
            users::is_active.eq(excluded(users::is_active)),
        ))
        .execute(connection)?;
    Ok(())
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        user_id: user.id().as_str().to_owned(),
        username: user.username().to_owned(),
        team_name: user.team_name().as_str().to_owned(),
        is_active: user.is_active(),
    }
}

fn row_to_user(row: UserRow) -> DirectoryRepositoryResult<User> {
    let UserRow {
        user_id,
        username,
        team_name,
        is_active,
    } = row;
    let id = UserId::new(user_id).map_err(DirectoryRepositoryError::invalid_persisted_data)?;
    let team = TeamName::new(team_name).map_err(DirectoryRepositoryError::invalid_persisted_data)?;
    User::new(id, username, team, is_active)
        .map_err(DirectoryRepositoryError::invalid_persisted_data)
}

fn row_to_member(row: UserRow) -> DirectoryRepositoryResult<TeamMember> {
    row_to_user(row).map(|user| TeamMember::from(&user))
}
