//! Build container images with the release tag.
use log::*;
use std::path::Path;

use crate::{
    cli, command::common::REPOS_ROOT, docker::DockerCli, error::Result,
    spec::ReleaseSpec,
};

pub fn execute(spec: &ReleaseSpec, args: &cli::Args) -> Result<()> {
    for component in spec.selected(&args.repository) {
        let Some(images) = &component.docker_hub_repositories else {
            info!("no image to generate in {}", component.repository_name);
            continue;
        };

        let workdir = Path::new(REPOS_ROOT).join(&component.repository_name);

        for image in images {
            DockerCli::build(
                &image.name,
                &spec.tag,
                &workdir.join(&image.dockerfile),
                &workdir,
            )?;
        }
    }

    Ok(())
}
