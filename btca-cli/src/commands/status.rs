//! Status command - repo health against the remote

use clap::Args;

use btca_core::{evaluate_status, Registry};

/// Show repo health (one repo, or all)
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Repo name; omit to show every configured repo
    name: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, registry: &Registry) -> anyhow::Result<()> {
        let config = registry.config();

        match &self.name {
            Some(name) => {
                let status = evaluate_status(config, name).await?;
                println!("Repo:   {name}");
                println!("Path:   {}", status.path.display());
                println!("State:  {}", status.classify());
                if status.exists {
                    println!("Dirty:  {}", if status.dirty { "yes" } else { "no" });
                    println!("Ahead:  {}", status.ahead);
                    println!("Behind: {}", status.behind);
                }
            }
            None => {
                let repos = registry.repos();
                if repos.is_empty() {
                    println!("No repos configured.");
                    return Ok(());
                }

                let width = repos
                    .iter()
                    .map(|r| r.name.len())
                    .max()
                    .unwrap_or(4)
                    .max(4);

                println!("{:<width$}  {:<10}  {:<12}  PATH", "NAME", "BRANCH", "STATE");
                for repo in repos {
                    let status = evaluate_status(config, &repo.name).await?;
                    println!(
                        "{:<width$}  {:<10}  {:<12}  {}",
                        repo.name,
                        repo.branch,
                        status.classify().to_string(),
                        status.path.display()
                    );
                }
            }
        }

        Ok(())
    }
}
