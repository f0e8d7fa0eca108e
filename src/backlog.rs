//! Backlog assembly: mining merged pull requests from commit history.
//!
//! Walks each repository backward from its current commit to the previous
//! baseline boundary, recognizes merge commits, resolves pull request titles
//! and linked-issue references through the source-hosting API, and renders one
//! section per repository.
use log::*;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::{
    error::{BaselinerError, Result},
    forge::traits::Forge,
    repo::{CommitRecord, Repository},
    spec::ReleaseSpec,
};

/// The tracking repository whose issue references are mined from PR bodies.
pub const TRACKING_REPOSITORY: &str = "dojot/dojot";

/// Title reported for pull requests the API has no record (or no body) for.
pub const PR_NOT_FOUND_TITLE: &str = "PR not found";

/// Linked-issue marker paired with [`PR_NOT_FOUND_TITLE`]. A literal
/// single-element list, not an empty one; the renderer treats it as "no
/// issues" rather than something to list after "fixing".
pub const NO_LINKED_ISSUES: &str = "none";

static MERGE_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(\d+) from ").unwrap()
});

/// A commit recognized as the merge of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEvent {
    pub pr_number: String,
}

/// Recognize a merge-commit message and extract the pull request number.
/// Pure and stateless; anything else yields no match.
pub fn classify(commit: &CommitRecord) -> Option<MergeEvent> {
    MERGE_COMMIT.captures(&commit.message).map(|caps| MergeEvent {
        pr_number: caps[1].to_string(),
    })
}

/// Title and linked-issue references resolved for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub title: String,
    pub linked_issues: Vec<String>,
}

impl PullRequestInfo {
    /// The record returned when the API has no usable PR data.
    pub fn not_found() -> Self {
        Self {
            title: PR_NOT_FOUND_TITLE.to_string(),
            linked_issues: vec![NO_LINKED_ISSUES.to_string()],
        }
    }

    fn is_not_found_marker(&self) -> bool {
        self.linked_issues.len() == 1
            && self.linked_issues[0] == NO_LINKED_ISSUES
    }
}

/// Seam for resolving pull request details during backlog assembly.
#[cfg_attr(test, mockall::automock)]
pub trait ResolvePullRequest {
    fn resolve(
        &self,
        repository: &str,
        pr_number: &str,
    ) -> Result<PullRequestInfo>;
}

/// Resolves pull requests through the source-hosting API: one read per PR,
/// no retries, tracking-repository issue references scanned from the body.
pub struct PullRequestResolver<'a> {
    forge: &'a dyn Forge,
    issue_pattern: Regex,
}

impl<'a> PullRequestResolver<'a> {
    pub fn new(forge: &'a dyn Forge) -> Result<Self> {
        let issue_pattern = Regex::new(&format!(
            "{}#[0-9]+",
            regex::escape(TRACKING_REPOSITORY)
        ))?;

        Ok(Self {
            forge,
            issue_pattern,
        })
    }
}

impl ResolvePullRequest for PullRequestResolver<'_> {
    fn resolve(
        &self,
        repository: &str,
        pr_number: &str,
    ) -> Result<PullRequestInfo> {
        let Some(details) =
            self.forge.get_pull_request(repository, pr_number)?
        else {
            return Ok(PullRequestInfo::not_found());
        };

        // first-occurrence order, duplicates preserved
        let linked_issues = self
            .issue_pattern
            .find_iter(&details.body)
            .map(|m| m.as_str().to_string())
            .collect();

        Ok(PullRequestInfo {
            title: details.title,
            linked_issues,
        })
    }
}

/// Assembles backlog sections by walking repositories between baselines.
pub struct BacklogAssembler<'a> {
    resolver: &'a dyn ResolvePullRequest,
}

impl<'a> BacklogAssembler<'a> {
    pub fn new(resolver: &'a dyn ResolvePullRequest) -> Self {
        Self { resolver }
    }

    /// Build the backlog section for one repository: walk backward from
    /// `current_commit`, stopping at `last_commit` (excluded). Empty when no
    /// merged pull requests lie between the two commits. Exhausting history
    /// without reaching the boundary is an error, not an empty result.
    pub fn assemble_one(
        &self,
        repo: &Repository,
        label: &str,
        last_commit: &str,
        current_commit: &str,
    ) -> Result<String> {
        info!("building backlog for repository {label}");

        let mut entries = vec![];
        let mut boundary_reached = false;

        for record in repo.walk(current_commit)? {
            let record = record?;

            if record.hash == last_commit {
                boundary_reached = true;
                break;
            }

            let Some(event) = classify(&record) else {
                continue;
            };

            debug!("retrieving information for PR {label}#{}", event.pr_number);
            let info = self.resolver.resolve(label, &event.pr_number)?;
            entries.push(format_entry(label, &event.pr_number, &info));
        }

        if !boundary_reached {
            return Err(BaselinerError::baseline_not_found(label, last_commit));
        }

        if entries.is_empty() {
            return Ok(String::new());
        }

        let underline: String =
            label.chars().map(|_| '-').collect();
        let mut section = format!("{label}\n{underline}\n\n");
        for entry in &entries {
            section.push_str(entry);
            section.push('\n');
        }

        Ok(section)
    }

    /// Assemble the fleet report: every selected component in spec order,
    /// non-empty sections separated by a blank line.
    pub fn assemble_all(
        &self,
        spec: &ReleaseSpec,
        repos_root: &Path,
        selected_repo: &str,
    ) -> Result<String> {
        let mut report = String::new();

        for component in spec.selected(selected_repo) {
            let repo =
                Repository::open(&repos_root.join(&component.repository_name))?;
            let section = self.assemble_one(
                &repo,
                &component.github_repository,
                &component.last_commit,
                &component.current_commit,
            )?;

            if !section.is_empty() {
                report.push_str(&section);
                report.push_str("\n\n");
            }
        }

        Ok(report)
    }
}

fn format_entry(label: &str, pr_number: &str, info: &PullRequestInfo) -> String {
    let mut line = format!("{label}#{pr_number}");

    if !info.linked_issues.is_empty() && !info.is_not_found_marker() {
        line.push_str(", fixing");
        for issue in &info.linked_issues {
            line.push(' ');
            line.push_str(issue);
        }
    }

    line.push_str(": ");
    line.push_str(&info.title);
    line
}
