//! Traits related to the remote source-hosting API.
use crate::{
    error::Result,
    forge::types::{CreatePrRequest, PullRequestDetails},
};

#[cfg_attr(test, mockall::automock)]
pub trait Forge {
    /// Fetch title and body for one pull request in an "owner/name"
    /// repository. `None` when the record or its body is missing.
    fn get_pull_request(
        &self,
        repository: &str,
        number: &str,
    ) -> Result<Option<PullRequestDetails>>;

    /// Resolve the opaque repository id consumed by the PR-creation mutation.
    fn get_repository_id(&self, owner: &str, name: &str) -> Result<String>;

    /// Open a pull request between two existing branches.
    fn create_pull_request(&self, req: CreatePrRequest) -> Result<()>;
}
