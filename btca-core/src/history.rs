//! Question/answer history and bookmarks
//!
//! Both stores are flat JSON arrays persisted through the same document
//! store as the config, with the same degrade-to-empty policy for malformed
//! files. History is a rolling window; bookmarks are entries promoted out
//! of it and kept until removed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{paths, store, Result};

/// Rolling cap on stored history entries
pub const HISTORY_LIMIT: usize = 100;

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub repo: String,
    pub provider: String,
    pub model: String,
    pub asked_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        repo: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            repo: repo.into(),
            provider: provider.into(),
            model: model.into(),
            asked_at: Utc::now(),
        }
    }
}

/// The rolling question/answer history
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the per-user history document
    pub fn open_default() -> Result<Self> {
        Self::open_at(paths::history_file()?)
    }

    /// Open a history document at an explicit path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let entries = store::load_or(&path, Vec::new)?;
        Ok(Self { path, entries })
    }

    /// Stored entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Fetch one entry by zero-based index (0 is the oldest)
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Append an entry and persist, evicting the oldest past the cap
    pub fn push(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.push(entry);
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
        store::save(&self.path, &self.entries)
    }

    /// Drop every entry and persist the empty document
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        store::save(&self.path, &self.entries)
    }
}

/// A history entry promoted to a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub question: String,
    pub answer: String,
    pub repo: String,
    pub provider: String,
    pub model: String,
    pub saved_at: DateTime<Utc>,
}

impl BookmarkEntry {
    /// Promote a history entry, stamping the save time
    pub fn from_history(entry: &HistoryEntry, label: Option<String>) -> Self {
        Self {
            label,
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            repo: entry.repo.clone(),
            provider: entry.provider.clone(),
            model: entry.model.clone(),
            saved_at: Utc::now(),
        }
    }
}

/// The bookmark collection
#[derive(Debug)]
pub struct BookmarkStore {
    path: PathBuf,
    entries: Vec<BookmarkEntry>,
}

impl BookmarkStore {
    /// Open the per-user bookmarks document
    pub fn open_default() -> Result<Self> {
        Self::open_at(paths::bookmarks_file()?)
    }

    /// Open a bookmarks document at an explicit path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let entries = store::load_or(&path, Vec::new)?;
        Ok(Self { path, entries })
    }

    /// Stored bookmarks, oldest first
    pub fn entries(&self) -> &[BookmarkEntry] {
        &self.entries
    }

    /// Add a bookmark and persist
    pub fn add(&mut self, entry: BookmarkEntry) -> Result<()> {
        self.entries.push(entry);
        store::save(&self.path, &self.entries)
    }

    /// Remove a bookmark by zero-based index or label
    ///
    /// Returns the removed entry, or `None` when nothing matches.
    pub fn remove(&mut self, selector: &str) -> Result<Option<BookmarkEntry>> {
        let index = selector
            .parse::<usize>()
            .ok()
            .filter(|i| *i < self.entries.len())
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|b| b.label.as_deref() == Some(selector))
            });

        let Some(index) = index else {
            return Ok(None);
        };

        let removed = self.entries.remove(index);
        store::save(&self.path, &self.entries)?;
        Ok(Some(removed))
    }
}
