//! Stats command - language, size, and contributor breakdown

use clap::Args;

use btca_core::{ensure_local, stats, Registry, RepoLocks, LOCAL_REPO};

/// Show repository statistics
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Repo to report on ("local" means the current working directory)
    #[arg(default_value = LOCAL_REPO)]
    name: String,
}

impl StatsArgs {
    /// Execute the stats command
    pub async fn execute(&self, registry: &Registry) -> anyhow::Result<()> {
        let locks = RepoLocks::new();
        let resolved = ensure_local(registry.config(), &self.name, &locks).await?;

        let report = stats::collect(&resolved.path).await?;

        println!("Repo: {} ({})", resolved.name, resolved.path.display());
        println!();

        println!("Languages (by tracked files):");
        for language in &report.languages {
            println!("  {:<12} {}", language.extension, language.files);
        }
        println!();

        println!("Total lines: {}", report.total_lines);
        println!();

        println!("Top contributors:");
        for contributor in &report.contributors {
            println!("  {:<6} {}", contributor.commits, contributor.name);
        }

        Ok(())
    }
}
