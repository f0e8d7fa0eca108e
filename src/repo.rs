//! Git repository operations for baseline workflows.
//!
//! Wraps `git2` with the handful of operations the fleet commands need:
//! authenticated clone, release-branch creation at a pinned commit, annotated
//! tagging with an idempotency probe, ref pushes, and a lazy backward walk
//! over commit history for backlog assembly.
use git2::{BranchType, Oid, RemoteCallbacks};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use url::Url;

use crate::error::{BaselinerError, Result};

/// One commit yielded by the history walk. Produced lazily, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub message: String,
}

/// A fleet repository working copy.
pub struct Repository {
    repo: git2::Repository,
}

/// Create Git authentication callbacks for username/token authentication.
fn get_auth_callbacks<'r>(user: String, token: String) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        git2::Cred::userpass_plaintext(&user, &token)
    });
    callbacks
}

impl Repository {
    /// Clone a remote repository into `local_path` with token authentication.
    pub fn clone(
        url: &str,
        local_path: &Path,
        username: &str,
        token: &SecretString,
    ) -> Result<Self> {
        let url = Url::parse(url)?;

        // setup callbacks for authentication
        let callbacks = get_auth_callbacks(
            username.to_string(),
            token.expose_secret().to_string(),
        );

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        let mut builder = git2::build::RepoBuilder::new();
        let repo = builder
            .fetch_options(fetch_options)
            .clone(url.as_str(), local_path)?;

        Ok(Self { repo })
    }

    /// Open an existing working copy.
    pub fn open(local_path: &Path) -> Result<Self> {
        let repo = git2::Repository::open(local_path)?;
        Ok(Self { repo })
    }

    /// Create `branch` at the pinned commit and reset the working tree to it.
    pub fn create_branch_at(&self, branch: &str, commit_id: &str) -> Result<()> {
        info!("creating branch {branch} at {commit_id}");
        let oid = Oid::from_str(commit_id)?;
        let commit = self.repo.find_commit(oid)?;
        self.repo.branch(branch, &commit, true)?;
        self.repo.set_head(&format!("refs/heads/{branch}"))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout))?;

        Ok(())
    }

    /// Whether `tag` already exists in this repository.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/tags/{tag}"))
            .is_ok()
    }

    /// Create an annotated tag at the head of `branch`.
    pub fn tag_branch_head(
        &self,
        tag: &str,
        branch: &str,
        message: &str,
    ) -> Result<()> {
        let config = self.repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;

        let head = self.repo.find_branch(branch, BranchType::Local)?;
        let commit = head.get().peel_to_commit()?;
        let tagger = git2::Signature::now(user, email)?;

        self.repo
            .tag(tag, commit.as_object(), &tagger, message, false)?;

        Ok(())
    }

    /// Push a tag to the remote repository.
    pub fn push_tag(
        &self,
        tag: &str,
        username: &str,
        token: &SecretString,
    ) -> Result<()> {
        info!("pushing tag {tag}");
        self.push_ref(&format!("refs/tags/{tag}"), username, token)
    }

    /// Push a local branch to the remote repository.
    pub fn push_branch(
        &self,
        branch: &str,
        username: &str,
        token: &SecretString,
    ) -> Result<()> {
        info!("pushing branch {branch}");
        self.push_ref(&format!("refs/heads/{branch}"), username, token)
    }

    fn push_ref(
        &self,
        ref_spec: &str,
        username: &str,
        token: &SecretString,
    ) -> Result<()> {
        // setup callbacks for authentication
        let callbacks = get_auth_callbacks(
            username.to_string(),
            token.expose_secret().to_string(),
        );
        let mut push_opts = git2::PushOptions::default();
        push_opts.remote_callbacks(callbacks);

        let mut remote = self.repo.find_remote("origin")?;
        remote.push(&[ref_spec], Some(&mut push_opts))?;

        Ok(())
    }

    /// Start a lazy backward walk over first-parent history from `start_ref`.
    ///
    /// The walk never terminates on its own; the caller decides when to stop.
    /// A fresh call restarts from `start_ref`. Fails with `RefNotFound` when
    /// the ref does not resolve to a commit.
    pub fn walk(&self, start_ref: &str) -> Result<CommitWalk<'_>> {
        let object =
            self.repo.revparse_single(start_ref).map_err(|_| {
                BaselinerError::ref_not_found(self.workdir_as_str(), start_ref)
            })?;
        let commit = object.peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(commit.id())?;
        revwalk.simplify_first_parent()?;

        Ok(CommitWalk {
            revwalk,
            repo: &self.repo,
        })
    }

    /// Working directory path as a string, "." as fallback.
    pub fn workdir_as_str(&self) -> &str {
        if let Some(w) = self.repo.workdir()
            && let Some(p) = w.to_str()
        {
            return p;
        }

        "."
    }
}

/// Lazy iterator over first-parent history, newest commit first.
pub struct CommitWalk<'r> {
    revwalk: git2::Revwalk<'r>,
    repo: &'r git2::Repository,
}

impl std::fmt::Debug for CommitWalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitWalk").finish_non_exhaustive()
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.revwalk.next()? {
            Ok(oid) => oid,
            Err(err) => return Some(Err(err.into())),
        };

        let record = self.repo.find_commit(oid).map(|commit| CommitRecord {
            hash: commit.id().to_string(),
            message: commit.message().unwrap_or_default().to_string(),
        });

        Some(record.map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{commit_file, init_fixture_repo};

    #[test_log::test]
    fn walks_history_newest_first() {
        let fixture = init_fixture_repo();
        let c1 = commit_file(&fixture.repo, "a.txt", "first commit");
        let c2 = commit_file(&fixture.repo, "b.txt", "second commit");
        let c3 = commit_file(&fixture.repo, "c.txt", "third commit");

        let repo = Repository::open(fixture.dir.path()).unwrap();
        let hashes: Vec<String> = repo
            .walk(&c3)
            .unwrap()
            .map(|r| r.unwrap().hash)
            .collect();

        assert_eq!(hashes, vec![c3, c2, c1]);
    }

    #[test]
    fn walk_carries_full_commit_messages() {
        let fixture = init_fixture_repo();
        commit_file(&fixture.repo, "a.txt", "first commit");
        let head = commit_file(
            &fixture.repo,
            "b.txt",
            "Merge pull request #7 from dojot/feature\n\nbody text",
        );

        let repo = Repository::open(fixture.dir.path()).unwrap();
        let record = repo.walk(&head).unwrap().next().unwrap().unwrap();

        assert_eq!(record.hash, head);
        assert!(record.message.starts_with("Merge pull request #7 from"));
        assert!(record.message.contains("body text"));
    }

    #[test]
    fn walk_restarts_from_the_start_ref() {
        let fixture = init_fixture_repo();
        commit_file(&fixture.repo, "a.txt", "first commit");
        let head = commit_file(&fixture.repo, "b.txt", "second commit");

        let repo = Repository::open(fixture.dir.path()).unwrap();
        let first: Vec<String> =
            repo.walk(&head).unwrap().map(|r| r.unwrap().hash).collect();
        let second: Vec<String> =
            repo.walk(&head).unwrap().map(|r| r.unwrap().hash).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn walk_fails_for_unknown_ref() {
        let fixture = init_fixture_repo();
        commit_file(&fixture.repo, "a.txt", "first commit");

        let repo = Repository::open(fixture.dir.path()).unwrap();
        let result = repo.walk("0000000000000000000000000000000000000000");

        assert!(matches!(
            result.unwrap_err(),
            BaselinerError::RefNotFound { .. }
        ));
    }

    #[test_log::test]
    fn creates_branch_at_pinned_commit() {
        let fixture = init_fixture_repo();
        let pinned = commit_file(&fixture.repo, "a.txt", "first commit");
        commit_file(&fixture.repo, "b.txt", "second commit");

        let repo = Repository::open(fixture.dir.path()).unwrap();
        repo.create_branch_at("release/v1.0.0", &pinned).unwrap();

        let head = fixture.repo.head().unwrap();
        assert_eq!(head.shorthand(), Some("release/v1.0.0"));
        assert_eq!(head.peel_to_commit().unwrap().id().to_string(), pinned);
    }

    #[test]
    fn tags_branch_head_and_reports_existing_tags() {
        let fixture = init_fixture_repo();
        let pinned = commit_file(&fixture.repo, "a.txt", "first commit");

        let repo = Repository::open(fixture.dir.path()).unwrap();
        repo.create_branch_at("release/v1.0.0", &pinned).unwrap();

        assert!(!repo.has_tag("v1.0.0"));
        repo.tag_branch_head("v1.0.0", "release/v1.0.0", "Baseline: v1.0.0")
            .unwrap();
        assert!(repo.has_tag("v1.0.0"));
    }
}
