//! Remote status evaluation
//!
//! Computes dirty/ahead/behind against the tracking remote. The one place
//! local refs are mutated is the explicit fetch before counting; the working
//! tree is never altered.

use std::path::PathBuf;
use std::process::Output;

use crate::config::{Config, LOCAL_REPO};
use crate::{Error, Result};

use super::process;

/// Health of a configured repo's local clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    /// Whether the clone directory exists
    pub exists: bool,

    /// Uncommitted changes to tracked files (untracked files are ignored)
    pub dirty: bool,

    /// Commits on local `HEAD` that are not on the remote branch
    pub ahead: u32,

    /// Commits on the remote branch that are not on local `HEAD`
    pub behind: u32,

    /// The clone directory (the would-be directory when `exists` is false)
    pub path: PathBuf,
}

impl RepoStatus {
    fn absent(path: PathBuf) -> Self {
        Self {
            exists: false,
            dirty: false,
            ahead: 0,
            behind: 0,
            path,
        }
    }

    fn clean(path: PathBuf) -> Self {
        Self {
            exists: true,
            dirty: false,
            ahead: 0,
            behind: 0,
            path,
        }
    }

    /// Collapse the counters into a single-word classification
    ///
    /// `Dirty` wins over divergence, divergence over a one-sided drift.
    pub fn classify(&self) -> Classification {
        if !self.exists {
            Classification::Missing
        } else if self.dirty {
            Classification::Dirty
        } else if self.ahead > 0 && self.behind > 0 {
            Classification::Diverged
        } else if self.behind > 0 {
            Classification::Behind
        } else if self.ahead > 0 {
            Classification::Ahead
        } else {
            Classification::UpToDate
        }
    }
}

/// One-word health classification for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Missing,
    Dirty,
    Diverged,
    Behind,
    Ahead,
    UpToDate,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = match self {
            Classification::Missing => "Not cloned",
            Classification::Dirty => "Dirty",
            Classification::Diverged => "Diverged",
            Classification::Behind => "Behind",
            Classification::Ahead => "Ahead",
            Classification::UpToDate => "Up to date",
        };
        f.write_str(word)
    }
}

/// Evaluate the status of a configured repo
///
/// The `"local"` pseudo-repo always reports clean and current; nothing is
/// actually computed for it. A missing clone reports `exists: false`
/// without touching the network.
pub async fn evaluate(config: &Config, name: &str) -> Result<RepoStatus> {
    if name == LOCAL_REPO {
        return Ok(RepoStatus::clean(std::env::current_dir()?));
    }

    let entry = config
        .find_repo(name)
        .ok_or_else(|| Error::NotFound(name.to_string()))?;
    let path = config.local_path(name);

    if !path.is_dir() {
        return Ok(RepoStatus::absent(path));
    }

    let fetch = process::git(&["fetch", "origin"], Some(&path)).await?;
    if !fetch.status.success() {
        return Err(Error::FetchFailed {
            name: name.to_string(),
            reason: process::failure_reason(&fetch),
        });
    }

    let porcelain = process::git(
        &["status", "--porcelain", "--untracked-files=no"],
        Some(&path),
    )
    .await?;
    // a clone whose status cannot be read is treated as dirty
    let dirty = if porcelain.status.success() {
        !porcelain.stdout.is_empty()
    } else {
        true
    };

    let range = format!("HEAD...origin/{}", entry.branch);
    let (ahead, behind) = match process::git(
        &["rev-list", "--left-right", "--count", &range],
        Some(&path),
    )
    .await
    {
        Ok(out) if out.status.success() => parse_counts(&out).unwrap_or((0, 0)),
        // counters degrade to zero rather than failing the whole command
        _ => (0, 0),
    };

    Ok(RepoStatus {
        exists: true,
        dirty,
        ahead,
        behind,
        path,
    })
}

fn parse_counts(output: &Output) -> Option<(u32, u32)> {
    let text = String::from_utf8_lossy(&output.stdout);
    let mut parts = text.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}
