//! Immutable runtime credentials, built once at startup.
use secrecy::SecretString;
use std::env;

use crate::error::{BaselinerError, Result};

const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const GITHUB_API_TOKEN: &str = "GITHUB_API_TOKEN";
const DOCKER_USERNAME: &str = "DOCKER_USERNAME";
const DOCKER_TOKEN: &str = "DOCKER_TOKEN";

/// Credentials for the source-hosting API and the container registry.
///
/// Every command requires the full set; missing variables are reported
/// together before any network call is attempted.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username for authenticated git operations.
    pub github_username: String,
    /// Token paired with the username for git clone/push.
    pub github_token: SecretString,
    /// Token for the source-hosting REST and GraphQL APIs.
    pub github_api_token: SecretString,
    /// Registry username.
    pub docker_username: String,
    /// Registry token.
    pub docker_token: SecretString,
}

impl Credentials {
    /// Read all required variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing: Vec<String> = vec![];

        let mut require = |name: &str| {
            if let Some(value) = lookup(name) {
                value
            } else {
                missing.push(name.to_string());
                String::new()
            }
        };

        let github_username = require(GITHUB_USERNAME);
        let github_token = require(GITHUB_TOKEN);
        let github_api_token = require(GITHUB_API_TOKEN);
        let docker_username = require(DOCKER_USERNAME);
        let docker_token = require(DOCKER_TOKEN);

        drop(require);

        if !missing.is_empty() {
            return Err(BaselinerError::MissingEnvVars(missing));
        }

        Ok(Self {
            github_username,
            github_token: SecretString::from(github_token),
            github_api_token: SecretString::from(github_api_token),
            docker_username,
            docker_token: SecretString::from(docker_token),
        })
    }
}
