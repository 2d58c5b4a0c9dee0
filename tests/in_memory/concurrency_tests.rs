//! Concurrent edits of one pull request through the in-memory adapters.

use std::collections::HashSet;
use std::sync::Arc;

use super::helpers::{App, app};
use reviewroster::review::{domain::PullRequestStatus, services::CreatePullRequestRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reassignments_of_one_slot_apply_once(app: App) -> Result<(), eyre::Report> {
    app.add_team("T", &["A", "B", "C", "D", "E", "F"]).await?;
    let created = app
        .lifecycle
        .create(CreatePullRequestRequest::new("pr1", "Add search", "A"))
        .await?;
    let departing = created
        .assigned_reviewers()
        .first()
        .cloned()
        .ok_or_else(|| eyre::eyre!("missing reviewer"))?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let lifecycle = Arc::clone(&app.lifecycle);
        let reviewer = departing.clone();
        handles.push(tokio::spawn(async move {
            lifecycle.reassign("pr1", reviewer.as_str()).await
        }));
    }
    let mut successes = 0_usize;
    for handle in handles {
        if handle.await?.is_ok() {
            successes += 1;
        }
    }

    let reviews = app.lifecycle.reviews_for_user(departing.as_str()).await?;
    eyre::ensure!(successes == 1, "exactly one reassignment may win, got {successes}");
    eyre::ensure!(reviews.is_empty(), "departing reviewer must be gone");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_merges_keep_the_first_timestamp(app: App) -> Result<(), eyre::Report> {
    app.add_team("T", &["A", "B", "C"]).await?;
    app.lifecycle
        .create(CreatePullRequestRequest::new("pr1", "Add search", "A"))
        .await?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let lifecycle = Arc::clone(&app.lifecycle);
        handles.push(tokio::spawn(async move { lifecycle.merge("pr1").await }));
    }
    let mut merged_at = HashSet::new();
    for handle in handles {
        let merged = handle.await??;
        eyre::ensure!(
            merged.status() == PullRequestStatus::Merged,
            "every merge must report a merged record"
        );
        merged_at.insert(merged.merged_at());
    }

    eyre::ensure!(merged_at.len() == 1, "merge timestamp must be set once");
    Ok(())
}
