//! Clone the fleet and create release branches at pinned commits.
use log::*;
use std::{fs, path::Path};

use crate::{
    cli,
    command::common::{REPOS_ROOT, release_branch},
    config::Credentials,
    error::Result,
    repo::Repository,
    spec::ReleaseSpec,
};

/// Host prefix for fleet repository clone URLs.
const GITHUB_BASE_URL: &str = "https://github.com";

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    checkout_fleet(spec, &args.repository, Path::new(REPOS_ROOT), credentials)
}

fn checkout_fleet(
    spec: &ReleaseSpec,
    selected_repo: &str,
    repos_root: &Path,
    credentials: &Credentials,
) -> Result<()> {
    info!("checking out repositories");
    let branch = release_branch(&spec.tag);

    fs::create_dir_all(repos_root)?;

    for component in spec.selected(selected_repo) {
        info!(
            "checking out {} from {} at commit {}",
            component.repository_name,
            component.github_repository,
            component.current_commit
        );

        let url =
            format!("{GITHUB_BASE_URL}/{}", component.github_repository);
        let dest = repos_root.join(&component.repository_name);

        let repo = Repository::clone(
            &url,
            &dest,
            &credentials.github_username,
            &credentials.github_token,
        )?;

        repo.create_branch_at(&branch, &component.current_commit)?;
        repo.push_branch(
            &branch,
            &credentials.github_username,
            &credentials.github_token,
        )?;
    }

    info!("repositories were checked out");
    Ok(())
}
