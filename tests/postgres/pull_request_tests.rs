//! `PostgreSQL` integration tests for pull request persistence and reviewer
//! reassignment.

use std::sync::Arc;

use crate::postgres::helpers::{TestDatabase, add_team, pr_id, team_name, user_id};
use chrono::Duration;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use reviewroster::directory::{domain::User, ports::DirectoryRepository};
use reviewroster::review::{
    domain::{PersistedPullRequestData, PullRequest, PullRequestStatus, ReviewerAssignment},
    ports::{Edit, PullRequestRepository, PullRequestRepositoryError},
    services::{CreatePullRequestRequest, ReviewError},
};
use rstest::rstest;

fn pull_request(id: &str, author: &str, reviewers: &[&str]) -> eyre::Result<PullRequest> {
    let parsed = reviewers
        .iter()
        .map(|reviewer| user_id(reviewer))
        .collect::<eyre::Result<Vec<_>>>()?;
    Ok(PullRequest::open(
        pr_id(id)?,
        format!("change {id}"),
        user_id(author)?,
        parsed,
        &DefaultClock,
    )?)
}

fn reviewer_ids(pull_request: &PullRequest) -> Vec<&str> {
    pull_request
        .assigned_reviewers()
        .iter()
        .map(|reviewer| reviewer.as_str())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewer_order_survives_create_and_replace(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_order")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true), ("d", true)]).await?;

    let mut created = pull_request("pr-1", "a", &["c", "b"])?;
    store.create(&created).await?;
    let loaded = store
        .find_by_id(&pr_id("pr-1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;
    eyre::ensure!(
        reviewer_ids(&loaded) == ["c", "b"],
        "creation order lost: {:?}",
        reviewer_ids(&loaded)
    );

    created.replace_reviewer(&user_id("c")?, user_id("d")?)?;
    store.replace(&created).await?;
    let replaced = store
        .find_by_id(&pr_id("pr-1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;
    eyre::ensure!(
        reviewer_ids(&replaced) == ["d", "b"],
        "vacated slot not kept: {:?}",
        reviewer_ids(&replaced)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_rejected_without_touching_reviewers(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_duplicate")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    store.create(&pull_request("pr-1", "a", &["b"])?).await?;

    let result = store.create(&pull_request("pr-1", "b", &["c"])?).await;
    let stored = store
        .find_by_id(&pr_id("pr-1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;

    eyre::ensure!(
        matches!(
            &result,
            Err(PullRequestRepositoryError::DuplicatePullRequest(id)) if id.as_str() == "pr-1"
        ),
        "expected DuplicatePullRequest, got {result:?}"
    );
    eyre::ensure!(stored.author_id().as_str() == "a", "original author kept");
    eyre::ensure!(reviewer_ids(&stored) == ["b"], "original reviewers kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_keeps_stored_creation_time_and_reports_missing(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_replace")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    store.create(&pull_request("pr-1", "a", &["b"])?).await?;
    let original = store
        .find_by_id(&pr_id("pr-1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;

    let shifted = PullRequest::from_persisted(PersistedPullRequestData {
        id: original.id().clone(),
        name: original.name().to_owned(),
        author_id: original.author_id().clone(),
        status: original.status(),
        created_at: original.created_at() - Duration::hours(3),
        merged_at: None,
        assigned_reviewers: vec![user_id("c")?],
    })?;
    store.replace(&shifted).await?;
    let missing = store.replace(&pull_request("pr-404", "a", &[])?).await;
    let stored = store
        .find_by_id(&pr_id("pr-1")?)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;

    eyre::ensure!(
        stored.created_at() == original.created_at(),
        "creation time must not be rewritten"
    );
    eyre::ensure!(reviewer_ids(&stored) == ["c"], "reviewers replaced");
    eyre::ensure!(
        matches!(&missing, Err(PullRequestRepositoryError::NotFound(id)) if id.as_str() == "pr-404"),
        "expected NotFound, got {missing:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_rejection_rolls_back_and_keep_writes_nothing(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_edit")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    store.create(&pull_request("pr-1", "a", &["b"])?).await?;
    let id = pr_id("pr-1")?;
    let departing = user_id("b")?;
    let replacement = user_id("c")?;

    let missing = id.clone();
    let rejected = store
        .edit(&id, move |current| -> Result<Edit<()>, PullRequestRepositoryError> {
            let mut changed = current.ok_or(PullRequestRepositoryError::NotFound(missing))?;
            changed
                .replace_reviewer(&departing, replacement)
                .map_err(PullRequestRepositoryError::invalid_persisted_data)?;
            Err(PullRequestRepositoryError::NotFound(changed.id().clone()))
        })
        .await;
    let missing_again = id.clone();
    let (kept, seen) = store
        .edit(&id, move |current| -> Result<_, PullRequestRepositoryError> {
            let mut record = current.ok_or(PullRequestRepositoryError::NotFound(missing_again))?;
            let merged = record.merge(chrono::Utc::now());
            Ok(Edit::Keep(record, merged))
        })
        .await?;
    let stored = store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| eyre::eyre!("pull request missing"))?;

    eyre::ensure!(rejected.is_err(), "rejection must surface");
    eyre::ensure!(seen && kept.is_merged(), "callback saw the open record");
    eyre::ensure!(reviewer_ids(&stored) == ["b"], "rejected edit must roll back");
    eyre::ensure!(
        stored.status() == PullRequestStatus::Open,
        "kept edit must not be written"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reassignments_on_one_pull_request_let_exactly_one_win(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_lock")?;
    let directory = db.directory()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    let lifecycle = Arc::new(db.lifecycle(3)?);
    let created = lifecycle
        .create(CreatePullRequestRequest::new("pr-1", "Add search", "a"))
        .await?;
    eyre::ensure!(
        reviewer_ids(&created) == ["b", "c"] || reviewer_ids(&created) == ["c", "b"],
        "both teammates must be assigned"
    );
    directory
        .upsert_user(&User::new(user_id("d")?, "user d", team_name("backend")?, true)?)
        .await?;

    let first = {
        let service = Arc::clone(&lifecycle);
        tokio::spawn(async move { service.reassign("pr-1", "b").await })
    };
    let second = {
        let service = Arc::clone(&lifecycle);
        tokio::spawn(async move { service.reassign("pr-1", "b").await })
    };
    let outcomes = [first.await?, second.await?];

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let losers_not_assigned = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(ReviewError::NotAssigned { .. })))
        .count();
    let taken_over = lifecycle.reviews_for_user("d").await?;

    eyre::ensure!(winners == 1, "exactly one reassignment may win, got {winners}");
    eyre::ensure!(
        losers_not_assigned == 1,
        "the loser must see the reviewer already gone: {outcomes:?}"
    );
    eyre::ensure!(taken_over.len() == 1, "the single candidate takes the slot once");
    eyre::ensure!(
        lifecycle.reviews_for_user("b").await?.is_empty(),
        "departing reviewer must be gone"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_assignments_follow_status_and_current_team(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_snapshot")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    add_team(&directory, "frontend", &[("f", true)]).await?;
    store.create(&pull_request("pr-1", "a", &["b", "c"])?).await?;
    let mut merged = pull_request("pr-2", "a", &["b"])?;
    store.create(&merged).await?;
    merged.merge(chrono::Utc::now());
    store.replace(&merged).await?;
    directory
        .upsert_user(&User::new(user_id("c")?, "user c", team_name("frontend")?, true)?)
        .await?;

    let backend = store.open_assignments_for_team(&team_name("backend")?).await?;
    let frontend = store.open_assignments_for_team(&team_name("frontend")?).await?;
    let nobody = store.open_assignments_for_team(&team_name("nobody")?).await?;

    eyre::ensure!(
        backend == vec![ReviewerAssignment::new(pr_id("pr-1")?, user_id("b")?)],
        "backend snapshot {backend:?}"
    );
    eyre::ensure!(
        frontend == vec![ReviewerAssignment::new(pr_id("pr-1")?, user_id("c")?)],
        "frontend snapshot {frontend:?}"
    );
    eyre::ensure!(nobody.is_empty(), "unknown team has no assignments");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewer_lookup_and_stats_cover_every_status(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "pr_stats")?;
    let directory = db.directory()?;
    let store = db.pull_requests()?;
    add_team(&directory, "backend", &[("a", true), ("b", true), ("c", true)]).await?;
    store.create(&pull_request("pr-1", "a", &["b", "c"])?).await?;
    let mut merged = pull_request("pr-2", "a", &["b"])?;
    store.create(&merged).await?;
    merged.merge(chrono::Utc::now());
    store.replace(&merged).await?;

    let reviewing = store.find_by_reviewer(&user_id("b")?).await?;
    let stats = store.stats().await?;

    let ids: Vec<&str> = reviewing.iter().map(|pr| pr.id().as_str()).collect();
    eyre::ensure!(ids == ["pr-1", "pr-2"], "oldest first, any status: {ids:?}");
    eyre::ensure!(
        stats.per_status().get(&PullRequestStatus::Open) == Some(&1)
            && stats.per_status().get(&PullRequestStatus::Merged) == Some(&1),
        "status counts {stats:?}"
    );
    eyre::ensure!(
        stats.per_reviewer().get(&user_id("b")?) == Some(&2)
            && stats.per_reviewer().get(&user_id("c")?) == Some(&1),
        "reviewer counts {stats:?}"
    );
    Ok(())
}
