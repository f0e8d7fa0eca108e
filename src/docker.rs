//! Container build and publish tooling.
//!
//! Image builds and pushes shell out to the `docker` binary; registry-side
//! tag cleanup goes through the Docker Hub v2 API.
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tokio::runtime::Runtime;

use crate::error::{BaselinerError, Result};

/// Docker Hub endpoint used for registry login and tag deletion.
const DOCKER_HUB_URL: &str = "https://hub.docker.com";

/// Local `docker` CLI invocations.
pub struct DockerCli;

impl DockerCli {
    /// Build `image:tag` from a Dockerfile, without layer caching.
    pub fn build(
        image: &str,
        tag: &str,
        dockerfile: &Path,
        context: &Path,
    ) -> Result<()> {
        info!("building image {image}:{tag}");

        let status = Command::new("docker")
            .arg("build")
            .arg("-t")
            .arg(format!("{image}:{tag}"))
            .arg("--no-cache")
            .arg("-f")
            .arg(dockerfile)
            .arg(context)
            .status()?;

        Self::check("docker build", status)
    }

    /// Log the local daemon in to the registry. The token goes through stdin,
    /// never through the argument list.
    pub fn login(username: &str, token: &SecretString) -> Result<()> {
        info!("logging in to the registry as {username}");

        let mut child = Command::new("docker")
            .args(["login", "--username", username, "--password-stdin"])
            .stdin(Stdio::piped())
            .spawn()?;

        // stdin must be closed before wait, or the login blocks on EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(token.expose_secret().as_bytes())?;
        }

        let status = child.wait()?;
        Self::check("docker login", status)
    }

    /// Push `image:tag` to the registry.
    pub fn push(image: &str, tag: &str) -> Result<()> {
        info!("pushing image {image}:{tag}");

        let status = Command::new("docker")
            .args(["push", &format!("{image}:{tag}")])
            .status()?;

        Self::check("docker push", status)
    }

    fn check(program: &str, status: ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else {
            Err(BaselinerError::CommandFailed {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Docker Hub v2 API client behind a synchronous surface.
pub struct DockerHub {
    base_url: String,
    client: reqwest::Client,
    rt: Runtime,
}

impl DockerHub {
    pub fn new() -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            base_url: DOCKER_HUB_URL.to_string(),
            client: reqwest::Client::new(),
            rt,
        })
    }

    /// Log in to Docker Hub and return the session JWT.
    pub fn login(
        &self,
        username: &str,
        token: &SecretString,
    ) -> Result<String> {
        info!("logging in to Docker Hub");

        let url = format!("{}/v2/users/login/", self.base_url);
        let body = serde_json::json!({
            "username": username,
            "password": token.expose_secret(),
        });

        let response: LoginResponse = self.rt.block_on(async {
            self.client
                .post(&url)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })?;

        Ok(response.token)
    }

    /// Delete one tag from an "organization/image" repository.
    pub fn delete_tag(
        &self,
        jwt: &str,
        repository: &str,
        tag: &str,
    ) -> Result<()> {
        let (organization, image) =
            repository.split_once('/').ok_or_else(|| {
                BaselinerError::invalid_config(format!(
                    "expected organization/image repository, got '{repository}'"
                ))
            })?;

        info!("removing tag {tag} from {repository}");

        let url = format!(
            "{}/v2/repositories/{}/{}/tags/{}/",
            self.base_url, organization, image, tag
        );

        self.rt.block_on(async {
            self.client
                .delete(&url)
                .header("Authorization", format!("JWT {jwt}"))
                .send()
                .await?
                .error_for_status()?;

            Ok::<_, BaselinerError>(())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_status_maps_to_command_failed() {
        let status = Command::new("false").status().unwrap();
        let err = DockerCli::check("docker build", status).unwrap_err();

        assert!(matches!(err, BaselinerError::CommandFailed { .. }));
        assert!(err.to_string().starts_with("docker build failed"));
    }

    #[test]
    fn successful_status_passes() {
        let status = Command::new("true").status().unwrap();
        assert!(DockerCli::check("docker push", status).is_ok());
    }

    #[test]
    fn parses_hub_login_response() {
        let raw = r#"{"token":"header.payload.signature"}"#;
        let response: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.token, "header.payload.signature");
    }
}
