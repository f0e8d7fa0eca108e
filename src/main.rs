use clap::Parser;

mod backlog;
mod cli;
mod command;
mod config;
mod docker;
mod error;
mod forge;
mod repo;
mod spec;

#[cfg(test)]
mod test_helpers;

use crate::error::Result;

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("baseliner")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let credentials = config::Credentials::from_env()?;
    let spec = spec::load_for(&cli_args)?;

    match cli_args.command {
        cli::Command::Checkout => {
            command::checkout::execute(&spec, &cli_args, &credentials)
        }
        cli::Command::Build => command::build::execute(&spec, &cli_args),
        cli::Command::Push => {
            command::push::execute(&spec, &cli_args, &credentials)
        }
        cli::Command::Backlog => {
            command::backlog::execute(&spec, &cli_args, &credentials)
        }
        cli::Command::Cleanup => {
            command::cleanup::execute(&spec, &cli_args, &credentials)
        }
        cli::Command::CreateTags => {
            command::create_tags::execute(&spec, &cli_args, &credentials)
        }
        cli::Command::CreatePrs => {
            command::create_prs::execute(&spec, &cli_args, &credentials)
        }
    }
}
