//! Repo registry management commands

use clap::{Args, Subcommand};

use btca_core::{Registry, RepoEntry};

/// Manage the repo registry
#[derive(Args, Debug)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub command: RepoCommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Register a repo (the URL must be a reachable git remote)
    Add {
        /// Unique repo name, also the local clone directory name
        name: String,

        /// Git URL or local path to clone from
        url: String,

        /// Tracking branch
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Notes passed through to the agent prompt
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a repo from the registry
    Remove {
        /// Repo name
        name: String,

        /// Also delete the local clone
        #[arg(long)]
        delete_files: bool,
    },

    /// List configured repos
    #[command(visible_alias = "ls")]
    List,
}

impl RepoArgs {
    /// Execute the repo command
    pub async fn execute(&self, registry: &mut Registry) -> anyhow::Result<()> {
        match &self.command {
            RepoCommand::Add {
                name,
                url,
                branch,
                notes,
            } => {
                registry
                    .add_repo(RepoEntry {
                        name: name.clone(),
                        url: url.clone(),
                        branch: branch.clone(),
                        special_notes: notes.clone(),
                    })
                    .await?;
                println!("Added '{name}' ({url}, branch {branch})");
            }
            RepoCommand::Remove { name, delete_files } => {
                registry.remove_repo(name, *delete_files)?;
                if *delete_files {
                    println!("Removed '{name}' and its local clone");
                } else {
                    println!("Removed '{name}' (local clone left in place)");
                }
            }
            RepoCommand::List => {
                let repos = registry.repos();
                if repos.is_empty() {
                    println!("No repos configured.");
                    return Ok(());
                }

                for repo in repos {
                    println!("{}  {} ({})", repo.name, repo.url, repo.branch);
                    if let Some(notes) = &repo.special_notes {
                        println!("    {notes}");
                    }
                }
            }
        }

        Ok(())
    }
}
