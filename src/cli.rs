//! CLI argument parsing for the fleet release workflow.
use clap::{Parser, Subcommand, ValueEnum};

/// Global CLI arguments shared by every subcommand.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, short = 'r', default_value = "all", global = true)]
    /// Repository to operate on, or "all" for the whole fleet.
    pub repository: String,

    #[arg(long, short = 't', value_enum, default_value_t = BuildType::Baseline, global = true)]
    /// Build type. Nightly builds read the nightly spec file and date-suffix the tag.
    pub build_type: BuildType,

    #[arg(long, default_value_t = 15, global = true)]
    /// Age in days of the nightly tags targeted by cleanup.
    pub age: u64,

    #[arg(long = "branchfrom", default_value = "development", global = true)]
    /// Head branch for create-prs.
    pub branch_from: String,

    #[arg(long = "branchto", default_value = "master", global = true)]
    /// Base branch for create-prs.
    pub branch_to: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Fleet operation subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clone every repository and create the release branch at its pinned commit.
    Checkout,

    /// Build container images with the release tag.
    Build,

    /// Push built container images to the registry.
    Push,

    /// Assemble the cross-repository backlog and print it.
    Backlog,

    /// Delete aged release tags from the registry.
    Cleanup,

    /// Create and push the baseline git tag for every repository.
    CreateTags,

    /// Open merge pull requests for every repository.
    CreatePrs,
}

/// Which spec file is read and how the release tag is derived.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Baseline,
    Nightly,
}

impl BuildType {
    /// Spec file read for this build type.
    pub fn spec_file(&self) -> &'static str {
        match self {
            BuildType::Baseline => "baseline-spec.json",
            BuildType::Nightly => "nightly-spec.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["baseliner", "backlog"]).unwrap();

        assert_eq!(args.repository, "all");
        assert_eq!(args.build_type, BuildType::Baseline);
        assert_eq!(args.age, 15);
        assert_eq!(args.branch_from, "development");
        assert_eq!(args.branch_to, "master");
        assert!(!args.debug);
        assert_eq!(args.command, Command::Backlog);
    }

    #[test]
    fn parses_every_subcommand() {
        let cases = [
            ("checkout", Command::Checkout),
            ("build", Command::Build),
            ("push", Command::Push),
            ("backlog", Command::Backlog),
            ("cleanup", Command::Cleanup),
            ("create-tags", Command::CreateTags),
            ("create-prs", Command::CreatePrs),
        ];

        for (name, expected) in cases {
            let args = Args::try_parse_from(["baseliner", name]).unwrap();
            assert_eq!(args.command, expected);
        }
    }

    #[test]
    fn parses_nightly_build_type() {
        let args =
            Args::try_parse_from(["baseliner", "-t", "nightly", "cleanup"])
                .unwrap();

        assert_eq!(args.build_type, BuildType::Nightly);
        assert_eq!(args.build_type.spec_file(), "nightly-spec.json");
    }

    #[test]
    fn rejects_unknown_build_type() {
        let result =
            Args::try_parse_from(["baseliner", "-t", "weekly", "build"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_pr_branch_options() {
        let args = Args::try_parse_from([
            "baseliner",
            "--branchfrom",
            "staging",
            "--branchto",
            "main",
            "create-prs",
        ])
        .unwrap();

        assert_eq!(args.branch_from, "staging");
        assert_eq!(args.branch_to, "main");
    }
}
