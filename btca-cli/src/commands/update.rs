//! Update command - clone or fast-forward every configured repo

use clap::Args;

use btca_core::{Registry, RepoLocks};

/// Clone or fast-forward every configured repo
#[derive(Args, Debug)]
pub struct UpdateArgs {}

impl UpdateArgs {
    /// Execute the update command
    ///
    /// Repos update sequentially in registry order; the first failure stops
    /// the run.
    pub async fn execute(&self, registry: &Registry) -> anyhow::Result<()> {
        if registry.repos().is_empty() {
            println!("No repos configured.");
            return Ok(());
        }

        let locks = RepoLocks::new();
        let updated = registry.update_all(&locks).await?;

        for repo in &updated {
            println!("{}  {}", repo.name, repo.path.display());
        }
        println!("Updated {} repo(s).", updated.len());

        Ok(())
    }
}
