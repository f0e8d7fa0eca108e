//! Create and push the baseline tag for every repository.
use log::*;
use std::path::Path;

use crate::{
    cli,
    command::common::{REPOS_ROOT, release_branch, tag_message},
    config::Credentials,
    error::Result,
    repo::Repository,
    spec::ReleaseSpec,
};

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    let repos_root = Path::new(REPOS_ROOT);
    create_tags(spec, &args.repository, repos_root)?;
    push_tags(spec, &args.repository, repos_root, credentials)
}

/// First pass: create the annotated baseline tag on each release branch head.
/// An existing tag is a logged skip, which keeps the command re-runnable.
fn create_tags(
    spec: &ReleaseSpec,
    selected_repo: &str,
    repos_root: &Path,
) -> Result<()> {
    info!("creating tag {} for repositories", spec.tag);
    let branch = release_branch(&spec.tag);

    for component in spec.selected(selected_repo) {
        let repo =
            Repository::open(&repos_root.join(&component.repository_name))?;

        if repo.has_tag(&spec.tag) {
            info!(
                "tag {} already exists for {}: skipping",
                spec.tag, component.repository_name
            );
            continue;
        }

        info!(
            "creating tag {} for repository {}",
            spec.tag, component.repository_name
        );
        repo.tag_branch_head(&spec.tag, &branch, &tag_message(&spec.tag))?;
    }

    Ok(())
}

/// Second pass: push every baseline tag.
fn push_tags(
    spec: &ReleaseSpec,
    selected_repo: &str,
    repos_root: &Path,
    credentials: &Credentials,
) -> Result<()> {
    for component in spec.selected(selected_repo) {
        info!(
            "pushing tag {} to repository {}",
            spec.tag, component.repository_name
        );

        let repo =
            Repository::open(&repos_root.join(&component.repository_name))?;
        repo.push_tag(
            &spec.tag,
            &credentials.github_username,
            &credentials.github_token,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::RepoConfig;
    use crate::test_helpers::{commit_file, init_fixture_repo};

    fn spec_for(name: &str, tag: &str) -> ReleaseSpec {
        ReleaseSpec {
            tag: tag.to_string(),
            components: vec![RepoConfig {
                repository_name: name.to_string(),
                github_repository: format!("dojot/{name}"),
                last_commit: "unused".to_string(),
                current_commit: "unused".to_string(),
                docker_hub_repositories: None,
            }],
        }
    }

    #[test]
    fn creating_tags_twice_is_a_noop_skip() {
        let root = tempfile::TempDir::new().unwrap();

        let fixture = init_fixture_repo();
        let pinned = commit_file(&fixture.repo, "a.txt", "baseline commit");
        let target = root.path().join("data-broker");
        std::fs::rename(fixture.dir.path(), &target).unwrap();

        let repo = Repository::open(&target).unwrap();
        repo.create_branch_at("release/v0.6.0", &pinned).unwrap();

        let spec = spec_for("data-broker", "v0.6.0");

        create_tags(&spec, "all", root.path()).unwrap();
        assert!(repo.has_tag("v0.6.0"));

        // second run must neither raise nor duplicate the tag
        create_tags(&spec, "all", root.path()).unwrap();
        assert!(repo.has_tag("v0.6.0"));
    }

    #[test]
    fn filtered_repository_is_untouched() {
        let root = tempfile::TempDir::new().unwrap();

        let fixture = init_fixture_repo();
        let pinned = commit_file(&fixture.repo, "a.txt", "baseline commit");
        let target = root.path().join("data-broker");
        std::fs::rename(fixture.dir.path(), &target).unwrap();

        let repo = Repository::open(&target).unwrap();
        repo.create_branch_at("release/v0.6.0", &pinned).unwrap();

        let spec = spec_for("data-broker", "v0.6.0");

        create_tags(&spec, "some-other-repo", root.path()).unwrap();
        assert!(!repo.has_tag("v0.6.0"));
    }
}
