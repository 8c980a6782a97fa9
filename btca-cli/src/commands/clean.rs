//! Clean command - evict local clones without touching the registry

use anyhow::bail;
use clap::Args;

use btca_core::{clean, Registry};

/// Remove local clones; registry entries survive
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Repo whose clone should be removed
    name: Option<String>,

    /// Remove every configured repo's clone
    #[arg(long, conflicts_with = "name")]
    all: bool,
}

impl CleanArgs {
    /// Execute the clean command
    pub async fn execute(&self, registry: &Registry) -> anyhow::Result<()> {
        let repos_dir = &registry.config().repos_directory;

        if self.all {
            let report = clean::clean_all(repos_dir, registry.repos());

            for name in &report.removed {
                println!("Removed {name}");
            }
            if !report.missing.is_empty() {
                println!("{} repo(s) had no local clone.", report.missing.len());
            }
            for (name, reason) in &report.failed {
                eprintln!("Failed to remove {name}: {reason}");
            }

            if !report.is_clean() {
                bail!("{} clone(s) could not be removed", report.failed.len());
            }
            return Ok(());
        }

        let Some(name) = &self.name else {
            bail!("specify a repo name or --all");
        };

        if registry.config().find_repo(name).is_none() {
            bail!("repo '{name}' is not configured");
        }

        if clean::clean_one(repos_dir, name)? {
            println!("Removed {name}");
        } else {
            println!("{name} has no local clone.");
        }

        Ok(())
    }
}
