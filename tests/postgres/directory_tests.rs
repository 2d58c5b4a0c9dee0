//! `PostgreSQL` integration tests for the team and user directory.

use crate::postgres::helpers::{TestDatabase, add_team, team, team_name, user_id};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use reviewroster::directory::{
    domain::User,
    ports::{DirectoryRepository, DirectoryRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_team_name_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_duplicate")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("u1", true)]).await?;

    let result = directory.create_team(&team("backend", &[("u2", true)])?).await;

    eyre::ensure!(
        matches!(
            &result,
            Err(DirectoryRepositoryError::DuplicateTeam(name)) if name.as_str() == "backend"
        ),
        "expected DuplicateTeam, got {result:?}"
    );
    eyre::ensure!(
        directory.find_user(&user_id("u2")?).await?.is_none(),
        "a rejected team must not leave its members behind"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_members_are_listed_by_user_id(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_members")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("u3", true), ("u1", false), ("u2", true)]).await?;

    let found = directory
        .find_team(&team_name("backend")?)
        .await?
        .ok_or_else(|| eyre::eyre!("team missing"))?;

    let members: Vec<(&str, bool)> = found
        .members()
        .iter()
        .map(|member| (member.user_id().as_str(), member.is_active()))
        .collect();
    eyre::ensure!(
        members == vec![("u1", false), ("u2", true), ("u3", true)],
        "unexpected members {members:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_team_moves_existing_users(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_move")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("u1", true), ("u2", true)]).await?;
    add_team(&directory, "frontend", &[("u2", false)]).await?;

    let backend = directory
        .find_team(&team_name("backend")?)
        .await?
        .ok_or_else(|| eyre::eyre!("team missing"))?;
    let moved = directory
        .find_user(&user_id("u2")?)
        .await?
        .ok_or_else(|| eyre::eyre!("user missing"))?;

    eyre::ensure!(backend.members().len() == 1, "u2 must leave backend");
    eyre::ensure!(moved.team_name().as_str() == "frontend", "u2 must join frontend");
    eyre::ensure!(!moved.is_active(), "the new team's flag wins");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_and_activity_updates_round_trip(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_upsert")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("u1", true)]).await?;

    directory
        .upsert_user(&User::new(user_id("u1")?, "renamed", team_name("backend")?, true)?)
        .await?;
    let updated = directory.set_user_active(&user_id("u1")?, false).await?;
    let missing = directory.set_user_active(&user_id("ghost")?, false).await;

    eyre::ensure!(updated.username() == "renamed", "username must be replaced");
    eyre::ensure!(!updated.is_active(), "flag must be cleared");
    eyre::ensure!(
        matches!(&missing, Err(DirectoryRepositoryError::UserNotFound(id)) if id.as_str() == "ghost"),
        "expected UserNotFound, got {missing:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivate_team_members_counts_only_active_members(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_deactivate")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("u1", true), ("u2", false), ("u3", true)]).await?;
    add_team(&directory, "frontend", &[("u4", true)]).await?;

    let first = directory.deactivate_team_members(&team_name("backend")?).await?;
    let second = directory.deactivate_team_members(&team_name("backend")?).await?;
    let unknown = directory.deactivate_team_members(&team_name("nobody")?).await?;
    let untouched = directory
        .find_user(&user_id("u4")?)
        .await?
        .ok_or_else(|| eyre::eyre!("user missing"))?;

    eyre::ensure!(first == 2, "two active members, got {first}");
    eyre::ensure!(second == 0, "nothing left to deactivate, got {second}");
    eyre::ensure!(unknown == 0, "unknown team changes nothing, got {unknown}");
    eyre::ensure!(untouched.is_active(), "other teams stay active");
    Ok(())
}
