//! Given steps for reviewer assignment BDD scenarios.

use super::world::{ReviewWorld, run_async, split_ids};
use eyre::WrapErr;
use reviewroster::directory::services::CreateTeamRequest;
use reviewroster::review::services::CreatePullRequestRequest;
use rstest_bdd_macros::given;

#[given(r#"team "{team}" with members "{members}""#)]
fn team_with_members(
    world: &mut ReviewWorld,
    team: String,
    members: String,
) -> Result<(), eyre::Report> {
    let request = split_ids(&members)
        .into_iter()
        .fold(CreateTeamRequest::new(team), |request, id| {
            let username = format!("user {id}");
            request.with_member(id, username, true)
        });
    run_async(world.directory.create_team(request)).wrap_err("create scenario team")?;
    Ok(())
}

#[given(r#""{author}" has opened pull request "{id}""#)]
fn pull_request_opened(
    world: &mut ReviewWorld,
    author: String,
    id: String,
) -> Result<(), eyre::Report> {
    let created = run_async(world.lifecycle.create(CreatePullRequestRequest::new(
        id.as_str(),
        format!("change {id}"),
        author,
    )))
    .wrap_err("open scenario pull request")?;
    world.opened.insert(id, created);
    Ok(())
}

#[given(r#"users "{users}" are deactivated"#)]
fn users_deactivated(world: &mut ReviewWorld, users: String) -> Result<(), eyre::Report> {
    for id in split_ids(&users) {
        run_async(world.directory.set_is_active(&id, false))
            .wrap_err_with(|| format!("deactivate user {id}"))?;
    }
    Ok(())
}

#[given(r#"pull request "{id}" has been merged"#)]
fn pull_request_merged(world: &mut ReviewWorld, id: String) -> Result<(), eyre::Report> {
    run_async(world.lifecycle.merge(&id)).wrap_err("merge scenario pull request")?;
    Ok(())
}
