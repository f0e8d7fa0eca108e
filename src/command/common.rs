//! Shared functionality for fleet commands.

/// Directory where `checkout` places fleet working copies and where the other
/// commands expect to find them.
pub const REPOS_ROOT: &str = "./git_repos";

/// Release branch name for a baseline tag.
pub fn release_branch(tag: &str) -> String {
    format!("release/{tag}")
}

/// Annotated tag message for a baseline tag.
pub fn tag_message(tag: &str) -> String {
    format!("Baseline: {tag}")
}
