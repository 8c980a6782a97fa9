//! Ask command - the core question flow

use clap::Args;

use btca_core::agent;
use btca_core::history::{HistoryEntry, HistoryStore};
use btca_core::{ensure_local, Registry, RepoLocks, LOCAL_REPO};

/// Ask a question about a configured repo
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    question: String,

    /// Repo to ask about ("local" means the current working directory)
    #[arg(short, long, default_value = LOCAL_REPO)]
    repo: String,
}

impl AskArgs {
    /// Execute the ask command
    pub async fn execute(&self, registry: &Registry) -> anyhow::Result<()> {
        let config = registry.config();
        let locks = RepoLocks::new();

        let resolved = ensure_local(config, &self.repo, &locks).await?;
        tracing::debug!(repo = %resolved.name, path = %resolved.path.display(), "repo resolved");

        let backend = agent::backend_for(&config.provider)?;
        let prompt = agent::build_prompt(&self.question, resolved.special_notes.as_deref());
        let answer = backend.ask(&prompt, &config.model, &resolved.path).await?;

        println!("{answer}");

        let mut history = HistoryStore::open_default()?;
        history.push(HistoryEntry::new(
            &self.question,
            &answer,
            &resolved.name,
            &config.provider,
            &config.model,
        ))?;

        Ok(())
    }
}
