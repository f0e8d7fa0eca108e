//! Shared data types for source-hosting API requests.

/// Title and body of a pull request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    pub title: String,
    pub body: String,
}

/// Request to open a pull request between two existing branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrRequest {
    /// Opaque repository id from [`crate::forge::traits::Forge::get_repository_id`].
    pub repository_id: String,
    /// Repository name, used for log and error messages only.
    pub repository_name: String,
    /// Branch the changes come from.
    pub head_branch: String,
    /// Branch the changes merge into.
    pub base_branch: String,
    pub title: String,
}
