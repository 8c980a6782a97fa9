//! Local clone removal
//!
//! Cleaning evicts clone directories only; registry entries survive, so the
//! next use of a cleaned repo triggers a fresh clone.

use std::path::Path;

use crate::config::{RepoEntry, LOCAL_REPO};
use crate::{Error, Result};

/// Outcome of a batch clean
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Repos whose clone directory was removed
    pub removed: Vec<String>,

    /// Repos that had no clone directory to begin with
    pub missing: Vec<String>,

    /// Repos whose removal failed, with the failure message
    pub failed: Vec<(String, String)>,
}

impl CleanReport {
    /// Whether every requested removal succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove one repo's clone directory
///
/// Returns `true` if a directory was removed, `false` if none existed.
/// The `"local"` pseudo-repo is rejected rather than deleting the process
/// working directory.
pub fn clean_one(repos_dir: &Path, name: &str) -> Result<bool> {
    if name == LOCAL_REPO {
        return Err(Error::LocalPseudoRepo("deleted"));
    }

    let path = repos_dir.join(name);
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(&path)
        .map_err(|e| Error::Storage(format!("failed to remove {}: {}", path.display(), e)))?;

    tracing::info!(repo = name, path = %path.display(), "removed local clone");
    Ok(true)
}

/// Remove every registered repo's clone directory, best-effort
///
/// A failure on one repo is recorded and iteration continues; callers report
/// which repos failed.
pub fn clean_all(repos_dir: &Path, entries: &[RepoEntry]) -> CleanReport {
    let mut report = CleanReport::default();

    for entry in entries {
        match clean_one(repos_dir, &entry.name) {
            Ok(true) => report.removed.push(entry.name.clone()),
            Ok(false) => report.missing.push(entry.name.clone()),
            Err(e) => {
                tracing::warn!(repo = %entry.name, error = %e, "failed to remove clone");
                report.failed.push((entry.name.clone(), e.to_string()));
            }
        }
    }

    report
}
