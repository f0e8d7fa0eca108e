//! Delete the release tag from the registry for every declared image.
use log::*;

use crate::{
    cli, config::Credentials, docker::DockerHub, error::Result,
    spec::ReleaseSpec,
};

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    let hub = DockerHub::new()?;
    let jwt =
        hub.login(&credentials.docker_username, &credentials.docker_token)?;

    for component in spec.selected(&args.repository) {
        let Some(images) = &component.docker_hub_repositories else {
            info!("no image to remove in {}", component.repository_name);
            continue;
        };

        for image in images {
            hub.delete_tag(&jwt, &image.name, &spec.tag)?;
        }
    }

    Ok(())
}
