//! History command - browse past questions and answers

use clap::{Args, Subcommand};

use btca_core::history::HistoryStore;

/// Browse past questions and answers
#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List recorded questions
    #[command(visible_alias = "ls")]
    List {
        /// Print full answers instead of the first line
        #[arg(long)]
        full: bool,
    },

    /// Drop every recorded entry
    Clear,
}

impl HistoryArgs {
    /// Execute the history command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut history = HistoryStore::open_default()?;

        match &self.command {
            HistoryCommand::List { full } => {
                if history.entries().is_empty() {
                    println!("No history yet.");
                    return Ok(());
                }

                for (index, entry) in history.entries().iter().enumerate() {
                    println!(
                        "[{index}] {} ({}, {})",
                        entry.question,
                        entry.repo,
                        entry.asked_at.format("%Y-%m-%d %H:%M")
                    );
                    if *full {
                        println!("{}", entry.answer);
                        println!();
                    } else if let Some(first_line) = entry.answer.lines().next() {
                        println!("    {first_line}");
                    }
                }
            }
            HistoryCommand::Clear => {
                history.clear()?;
                println!("History cleared.");
            }
        }

        Ok(())
    }
}
