//! Assemble the cross-repository backlog and print it to stdout.
use log::*;
use std::path::Path;

use crate::{
    backlog::{BacklogAssembler, PullRequestResolver},
    cli,
    command::common::REPOS_ROOT,
    config::Credentials,
    error::Result,
    forge::github::Github,
    spec::ReleaseSpec,
};

pub fn execute(
    spec: &ReleaseSpec,
    args: &cli::Args,
    credentials: &Credentials,
) -> Result<()> {
    let github = Github::new(credentials)?;
    let resolver = PullRequestResolver::new(&github)?;
    let assembler = BacklogAssembler::new(&resolver);

    let report = assembler.assemble_all(
        spec,
        Path::new(REPOS_ROOT),
        &args.repository,
    )?;

    info!("backlog assembled");
    println!("{report}");

    Ok(())
}
