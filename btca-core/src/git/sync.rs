//! Idempotent clone-or-pull for configured repos
//!
//! Every command that needs repo content goes through [`ensure_local`], so a
//! clone is always present and current by the time a path is handed to a
//! consumer. Concurrent callers (the HTTP endpoint serves one request per
//! connection) are serialized per repo name through [`RepoLocks`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::{Config, RepoEntry, LOCAL_REPO};
use crate::{Error, Result};

use super::process;

/// A repo resolved to a present, current local clone
#[derive(Debug, Clone)]
pub struct ResolvedRepo {
    /// Registry name, or `"local"` for the working-directory pseudo-repo
    pub name: String,

    /// Local clone directory (the working directory for `"local"`)
    pub path: PathBuf,

    /// Tracking branch; `None` for the pseudo-repo
    pub branch: Option<String>,

    /// Notes passed through to the agent prompt
    pub special_notes: Option<String>,
}

/// Keyed mutual exclusion over clone directories
///
/// Two concurrent `ensure_local` calls for the same repo name would race a
/// clone against a pull; each name gets its own async mutex so they
/// serialize while different names proceed in parallel.
#[derive(Clone, Default)]
pub struct RepoLocks {
    inner: Arc<StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl RepoLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a repo name, waiting if another caller holds it
    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            table.entry(name.to_string()).or_default().clone()
        };
        slot.lock_owned().await
    }
}

/// Ensure a named repo is present and fast-forwarded on local disk
///
/// `"local"` resolves to the process working directory without touching git
/// or the network. Otherwise the repo is looked up in the config, and the
/// clone directory's presence decides between clone and pull. An existing
/// directory is verified to be a work tree whose `origin` matches the
/// registry entry before it is pulled; a mismatch is an error, never a
/// silent re-clone.
pub async fn ensure_local(config: &Config, name: &str, locks: &RepoLocks) -> Result<ResolvedRepo> {
    if name == LOCAL_REPO {
        let cwd = std::env::current_dir()?;
        return Ok(ResolvedRepo {
            name: LOCAL_REPO.to_string(),
            path: cwd,
            branch: None,
            special_notes: None,
        });
    }

    let entry = config
        .find_repo(name)
        .ok_or_else(|| Error::NotFound(name.to_string()))?
        .clone();
    let dest = config.local_path(name);

    let _guard = locks.acquire(name).await;

    if dest.is_dir() {
        verify_work_tree(&dest, &entry)?;
        pull(&dest, &entry).await?;
    } else {
        clone(&entry, &dest).await?;
    }

    Ok(ResolvedRepo {
        name: entry.name,
        path: dest,
        branch: Some(entry.branch),
        special_notes: entry.special_notes,
    })
}

/// Check that an existing directory is a work tree cloned from the entry's URL
fn verify_work_tree(dest: &Path, entry: &RepoEntry) -> Result<()> {
    let repo = git2::Repository::open(dest).map_err(|_| Error::InvalidClone {
        name: entry.name.clone(),
        path: dest.display().to_string(),
    })?;

    let found = repo
        .find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().map(|u| u.to_string()))
        .ok_or_else(|| Error::RemoteMismatch {
            name: entry.name.clone(),
            expected: entry.url.clone(),
            found: "(no origin remote)".to_string(),
        })?;

    if normalize_url(&found) != normalize_url(&entry.url) {
        return Err(Error::RemoteMismatch {
            name: entry.name.clone(),
            expected: entry.url.clone(),
            found,
        });
    }

    Ok(())
}

fn normalize_url(url: &str) -> &str {
    url.trim_end_matches('/').trim_end_matches(".git")
}

async fn clone(entry: &RepoEntry, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Storage(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }

    tracing::info!(name = %entry.name, url = %entry.url, "cloning");

    let dest_str = dest.to_string_lossy();
    let output = process::git(
        &["clone", "--branch", &entry.branch, &entry.url, dest_str.as_ref()],
        None,
    )
    .await?;

    if !output.status.success() {
        // leave no partial clone behind
        let _ = std::fs::remove_dir_all(dest);
        return Err(Error::CloneFailed {
            name: entry.name.clone(),
            reason: process::failure_reason(&output),
        });
    }

    Ok(())
}

async fn pull(dest: &Path, entry: &RepoEntry) -> Result<()> {
    tracing::info!(name = %entry.name, "pulling");

    let output = process::git(&["pull", "--ff-only", "origin", &entry.branch], Some(dest)).await?;

    if !output.status.success() {
        return Err(Error::PullFailed {
            name: entry.name.clone(),
            reason: process::failure_reason(&output),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir, entries: Vec<RepoEntry>) -> Config {
        Config {
            repos_directory: temp.path().join("repos"),
            repos: entries,
            ..Config::default()
        }
    }

    fn fixture_entry(temp: &TempDir, name: &str) -> RepoEntry {
        let upstream = temp.path().join(format!("upstream-{name}"));
        std::fs::create_dir_all(&upstream).unwrap();
        fixtures::init_repo(&upstream);
        RepoEntry::new(name, upstream.to_string_lossy())
    }

    #[tokio::test]
    async fn test_local_pseudo_repo_resolves_to_cwd() {
        let config = Config::default();
        let locks = RepoLocks::new();

        let resolved = ensure_local(&config, LOCAL_REPO, &locks).await.unwrap();
        assert_eq!(resolved.path, std::env::current_dir().unwrap());
        assert!(resolved.branch.is_none());
    }

    #[tokio::test]
    async fn test_unknown_repo_is_not_found() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp, vec![]);
        let locks = RepoLocks::new();

        let result = ensure_local(&config, "missing", &locks).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clone_then_pull_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let entry = fixture_entry(&temp, "lib");
        let config = test_config(&temp, vec![entry]);
        let locks = RepoLocks::new();

        let first = ensure_local(&config, "lib", &locks).await.unwrap();
        let head_after_clone = fixtures::head_commit(&first.path);

        let second = ensure_local(&config, "lib", &locks).await.unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(head_after_clone, fixtures::head_commit(&second.path));
    }

    #[tokio::test]
    async fn test_pull_fast_forwards_to_remote_tip() {
        let temp = TempDir::new().unwrap();
        let entry = fixture_entry(&temp, "lib");
        let upstream = PathBuf::from(&entry.url);
        let config = test_config(&temp, vec![entry]);
        let locks = RepoLocks::new();

        ensure_local(&config, "lib", &locks).await.unwrap();
        fixtures::commit_change(&upstream, "new.txt", "fresh\n");

        let resolved = ensure_local(&config, "lib", &locks).await.unwrap();
        assert_eq!(
            fixtures::head_commit(&resolved.path),
            fixtures::head_commit(&upstream)
        );
    }

    #[tokio::test]
    async fn test_plain_directory_is_invalid_clone() {
        let temp = TempDir::new().unwrap();
        let entry = fixture_entry(&temp, "lib");
        let config = test_config(&temp, vec![entry]);
        std::fs::create_dir_all(config.local_path("lib")).unwrap();
        let locks = RepoLocks::new();

        let result = ensure_local(&config, "lib", &locks).await;
        assert!(matches!(result, Err(Error::InvalidClone { .. })));
    }

    #[tokio::test]
    async fn test_wrong_origin_is_remote_mismatch() {
        let temp = TempDir::new().unwrap();
        let entry = fixture_entry(&temp, "lib");
        let config = test_config(&temp, vec![entry]);

        // unrelated repository squatting on the clone directory
        let dest = config.local_path("lib");
        std::fs::create_dir_all(&dest).unwrap();
        fixtures::init_repo(&dest);
        fixtures::git(
            &dest,
            &["remote", "add", "origin", "https://example.com/other.git"],
        );

        let locks = RepoLocks::new();
        let result = ensure_local(&config, "lib", &locks).await;
        assert!(matches!(result, Err(Error::RemoteMismatch { .. })));
    }

    #[tokio::test]
    async fn test_locks_serialize_same_name() {
        let locks = RepoLocks::new();
        let held = locks.acquire("lib").await;

        let contended =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("lib")).await;
        assert!(contended.is_err());

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("docs")).await;
        assert!(other.is_ok());

        drop(held);
        let released =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("lib")).await;
        assert!(released.is_ok());
    }

    #[test]
    fn test_normalize_url_strips_suffixes() {
        assert_eq!(
            normalize_url("https://example.com/repo.git"),
            normalize_url("https://example.com/repo")
        );
        assert_eq!(
            normalize_url("https://example.com/repo/"),
            normalize_url("https://example.com/repo")
        );
    }
}
