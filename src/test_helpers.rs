//! Common test helper functions shared across test modules.
use std::path::Path;
use tempfile::TempDir;

/// A throwaway git repository backed by a temp directory.
pub struct FixtureRepo {
    pub dir: TempDir,
    pub repo: git2::Repository,
}

/// Initialize an empty repository with a configured committer identity.
pub fn init_fixture_repo() -> FixtureRepo {
    let dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "fixture").unwrap();
    config.set_str("user.email", "fixture@example.com").unwrap();
    drop(config);

    FixtureRepo { dir, repo }
}

/// Write a file, stage it, and commit it. Returns the commit hash.
pub fn commit_file(
    repo: &git2::Repository,
    name: &str,
    message: &str,
) -> String {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(name), message).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
        .to_string()
}
