//! Push built container images to the registry.
use log::*;

use crate::{
    cli, config::Credentials, docker::DockerCli, error::Result,
    spec::ReleaseSpec,
};

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    DockerCli::login(&credentials.docker_username, &credentials.docker_token)?;

    for component in spec.selected(&args.repository) {
        let Some(images) = &component.docker_hub_repositories else {
            info!("no image to push in {}", component.repository_name);
            continue;
        };

        for image in images {
            DockerCli::push(&image.name, &spec.tag)?;
        }
    }

    Ok(())
}
