//! In-memory model of the declarative release spec.
use chrono::{Days, NaiveDate};
use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{cli, error::Result};

/// Repository filter value meaning "the whole fleet".
pub const ALL_REPOSITORIES: &str = "all";

/// One fleet-wide release point: a tag name applied consistently across the
/// listed repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSpec {
    pub tag: String,
    pub components: Vec<RepoConfig>,
}

/// One repository in the fleet, pinned between two commits.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepoConfig {
    /// Unique key within the spec; used for filtering and as the clone
    /// directory name.
    pub repository_name: String,
    /// "owner/name" coordinates on the source host; also labels backlog
    /// sections.
    pub github_repository: String,
    /// Boundary commit included in the previous baseline.
    pub last_commit: String,
    /// Commit this baseline pins the repository to.
    pub current_commit: String,
    /// Container images declared for this repository, if any.
    #[serde(default)]
    pub docker_hub_repositories: Option<Vec<ImageSpec>>,
}

/// One container image built from a repository checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageSpec {
    pub name: String,
    pub dockerfile: String,
}

impl ReleaseSpec {
    /// Load a release spec from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let spec = serde_json::from_str(&raw)?;
        Ok(spec)
    }

    /// Components matching the `--repository` filter, in spec order.
    /// An unknown name yields an empty iteration, not an error.
    pub fn selected<'a>(
        &'a self,
        selected_repo: &'a str,
    ) -> impl Iterator<Item = &'a RepoConfig> {
        self.components.iter().filter(move |component| {
            if selected_repo != ALL_REPOSITORIES
                && component.repository_name != selected_repo
            {
                info!("skipping {}", component.repository_name);
                return false;
            }
            true
        })
    }
}

/// Read the spec file for the requested build type and resolve the tag.
pub fn load_for(args: &cli::Args) -> Result<ReleaseSpec> {
    info!("reading spec file {}", args.build_type.spec_file());
    let mut spec = ReleaseSpec::load(Path::new(args.build_type.spec_file()))?;

    if args.build_type == cli::BuildType::Nightly {
        let today = chrono::Local::now().date_naive();
        apply_nightly_tag(&mut spec, args.command, args.age, today);
    }

    Ok(spec)
}

/// Nightly tags carry a date suffix. Cleanup targets the tag produced `age`
/// days ago; every other command targets today's.
pub fn apply_nightly_tag(
    spec: &mut ReleaseSpec,
    command: cli::Command,
    age: u64,
    today: NaiveDate,
) {
    let date = if command == cli::Command::Cleanup {
        today - Days::new(age)
    } else {
        today
    };

    spec.tag = format!("{}{}", spec.tag, date.format("%Y%m%d"));
}
