//! Open merge pull requests for every repository in the fleet.
use log::*;

use crate::{
    cli,
    config::Credentials,
    error::{BaselinerError, Result},
    forge::{github::Github, traits::Forge, types::CreatePrRequest},
    spec::ReleaseSpec,
};

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    let github = Github::new(credentials)?;
    create_fleet_prs(
        spec,
        &args.repository,
        &args.branch_from,
        &args.branch_to,
        &github,
    )
}

fn create_fleet_prs(
    spec: &ReleaseSpec,
    selected_repo: &str,
    branch_from: &str,
    branch_to: &str,
    forge: &dyn Forge,
) -> Result<()> {
    let title = format!("Merge baseline {}", spec.tag);

    for component in spec.selected(selected_repo) {
        info!("creating pull request for {}", component.repository_name);

        let (owner, name) =
            component.github_repository.split_once('/').ok_or_else(|| {
                BaselinerError::invalid_config(format!(
                    "expected owner/name repository, got '{}'",
                    component.github_repository
                ))
            })?;

        let repository_id = forge.get_repository_id(owner, name)?;

        forge.create_pull_request(CreatePrRequest {
            repository_id,
            repository_name: name.to_string(),
            head_branch: branch_from.to_string(),
            base_branch: branch_to.to_string(),
            title: title.clone(),
        })?;
    }

    Ok(())
}
