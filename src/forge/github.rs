//! Implements the Forge trait for GitHub.
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::runtime::Runtime;

use crate::{
    config::Credentials,
    error::{BaselinerError, Result},
    forge::{
        traits::Forge,
        types::{CreatePrRequest, PullRequestDetails},
    },
};

const REPOSITORY_ID_QUERY: &str = r#"
query ($owner: String!, $repoName: String!) {
  repository(owner: $owner, name: $repoName) {
    id
  }
}"#;

const CREATE_PR_MUTATION: &str = r#"
mutation ($branchTo: String!, $titlePR: String!, $branchFrom: String!, $repoId: ID!) {
  createPullRequest(input: {baseRefName: $branchTo, title: $titlePR, repositoryId: $repoId, headRefName: $branchFrom, maintainerCanModify: true}) {
    pullRequest {
      title
      id
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct RepositoryIdRepository {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryIdData {
    pub repository: Option<RepositoryIdRepository>,
}

#[derive(Debug, Deserialize)]
struct RepositoryIdResult {
    pub data: Option<RepositoryIdData>,
}

/// GitHub client. Holds a current-thread runtime so callers get a synchronous
/// surface over octocrab's async API.
pub struct Github {
    instance: Octocrab,
    rt: Runtime,
}

impl Github {
    /// Create a client authenticated with the API token.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let token = credentials.github_api_token.expose_secret().to_string();
        let instance = Octocrab::builder().personal_token(token).build()?;

        Ok(Self { instance, rt })
    }

    fn split_repository(repository: &str) -> Result<(&str, &str)> {
        repository.split_once('/').ok_or_else(|| {
            BaselinerError::invalid_config(format!(
                "expected owner/name repository, got '{repository}'"
            ))
        })
    }
}

impl Forge for Github {
    fn get_pull_request(
        &self,
        repository: &str,
        number: &str,
    ) -> Result<Option<PullRequestDetails>> {
        let (owner, name) = Self::split_repository(repository)?;
        let number: u64 = number.parse().map_err(|_| {
            BaselinerError::remote_api(format!(
                "invalid pull request number: {number}"
            ))
        })?;

        let result = self
            .rt
            .block_on(async { self.instance.pulls(owner, name).get(number).await });

        match result {
            Ok(pr) => {
                // a record without a body resolves the same as no record
                let Some(body) = pr.body else {
                    return Ok(None);
                };

                Ok(Some(PullRequestDetails {
                    title: pr.title.unwrap_or_default(),
                    body,
                }))
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                info!("no pull request record for {repository}#{number}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_repository_id(&self, owner: &str, name: &str) -> Result<String> {
        info!("getting repository id for {owner}/{name}");

        let payload = serde_json::json!({
            "query": REPOSITORY_ID_QUERY,
            "variables": { "owner": owner, "repoName": name },
        });

        let result: RepositoryIdResult = self
            .rt
            .block_on(async { self.instance.graphql(&payload).await })?;

        result
            .data
            .and_then(|data| data.repository)
            .map(|repository| repository.id)
            .ok_or_else(|| {
                BaselinerError::remote_api(format!(
                    "no repository id returned for {owner}/{name}"
                ))
            })
    }

    fn create_pull_request(&self, req: CreatePrRequest) -> Result<()> {
        info!(
            "creating pull request for {} from {} to {}",
            req.repository_name, req.head_branch, req.base_branch
        );

        let payload = serde_json::json!({
            "query": CREATE_PR_MUTATION,
            "variables": {
                "branchTo": req.base_branch,
                "titlePR": req.title,
                "branchFrom": req.head_branch,
                "repoId": req.repository_id,
            },
        });

        let response: serde_json::Value = self
            .rt
            .block_on(async { self.instance.graphql(&payload).await })?;

        if let Some(errors) = response.get("errors") {
            return Err(BaselinerError::remote_api(format!(
                "failed to create pull request for {}: {errors}",
                req.repository_name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_owner_and_name() {
        let (owner, name) =
            Github::split_repository("dojot/data-broker").unwrap();
        assert_eq!(owner, "dojot");
        assert_eq!(name, "data-broker");
    }

    #[test]
    fn rejects_repository_without_owner() {
        let result = Github::split_repository("data-broker");
        assert!(matches!(
            result.unwrap_err(),
            BaselinerError::InvalidConfig(_)
        ));
    }

    #[test]
    fn deserializes_repository_id_response() {
        let raw = r#"{"data":{"repository":{"id":"MDEwOlJlcG9zaXRvcnk="}}}"#;
        let result: RepositoryIdResult = serde_json::from_str(raw).unwrap();

        let id = result.data.unwrap().repository.unwrap().id;
        assert_eq!(id, "MDEwOlJlcG9zaXRvcnk=");
    }

    #[test]
    fn missing_repository_deserializes_to_none() {
        let raw = r#"{"data":{"repository":null}}"#;
        let result: RepositoryIdResult = serde_json::from_str(raw).unwrap();

        assert!(result.data.unwrap().repository.is_none());
    }
}
