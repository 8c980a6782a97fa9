//! Bookmark command - keep answers worth returning to

use anyhow::bail;
use clap::{Args, Subcommand};

use btca_core::history::{BookmarkEntry, BookmarkStore, HistoryStore};

/// Keep answers worth returning to
#[derive(Args, Debug)]
pub struct BookmarkArgs {
    #[command(subcommand)]
    pub command: BookmarkCommand,
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommand {
    /// Promote a history entry (by its `history list` index) to a bookmark
    Add {
        /// History index to promote
        index: usize,

        /// Optional label for later lookup
        #[arg(short, long)]
        label: Option<String>,
    },

    /// List bookmarks
    #[command(visible_alias = "ls")]
    List,

    /// Remove a bookmark by index or label
    Remove {
        /// Bookmark index or label
        selector: String,
    },
}

impl BookmarkArgs {
    /// Execute the bookmark command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut bookmarks = BookmarkStore::open_default()?;

        match &self.command {
            BookmarkCommand::Add { index, label } => {
                let history = HistoryStore::open_default()?;
                let Some(entry) = history.get(*index) else {
                    bail!("no history entry at index {index}");
                };

                bookmarks.add(BookmarkEntry::from_history(entry, label.clone()))?;
                println!("Bookmarked: {}", entry.question);
            }
            BookmarkCommand::List => {
                if bookmarks.entries().is_empty() {
                    println!("No bookmarks yet.");
                    return Ok(());
                }

                for (index, bookmark) in bookmarks.entries().iter().enumerate() {
                    match &bookmark.label {
                        Some(label) => println!("[{index}] ({label}) {}", bookmark.question),
                        None => println!("[{index}] {}", bookmark.question),
                    }
                    println!("    {} / {}", bookmark.repo, bookmark.saved_at.format("%Y-%m-%d"));
                }
            }
            BookmarkCommand::Remove { selector } => match bookmarks.remove(selector)? {
                Some(removed) => println!("Removed bookmark: {}", removed.question),
                None => bail!("no bookmark matching '{selector}'"),
            },
        }

        Ok(())
    }
}
