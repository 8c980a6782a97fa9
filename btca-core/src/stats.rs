//! Read-only repository statistics
//!
//! Language breakdown, total line count, and top contributors for an
//! already-ensured clone. The three collectors only read, so they run
//! concurrently against the same directory.

use std::collections::HashMap;
use std::path::Path;

use crate::{Error, Result};

use crate::git::process;

const TOP_LANGUAGES: usize = 10;
const TOP_CONTRIBUTORS: usize = 5;

/// File count per extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCount {
    /// File extension, or `(none)` for extensionless files
    pub extension: String,
    pub files: usize,
}

/// Commit count per author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub name: String,
    pub commits: usize,
}

/// Aggregate statistics for one clone
#[derive(Debug, Clone)]
pub struct RepoStats {
    pub languages: Vec<LanguageCount>,
    pub total_lines: u64,
    pub contributors: Vec<Contributor>,
}

/// Collect statistics for the clone at `path`
pub async fn collect(path: &Path) -> Result<RepoStats> {
    let (languages, total_lines, contributors) =
        tokio::join!(languages(path), total_lines(path), contributors(path));

    Ok(RepoStats {
        languages: languages?,
        total_lines: total_lines?,
        contributors: contributors?,
    })
}

async fn tracked_files(path: &Path) -> Result<Vec<String>> {
    let output = process::git(&["ls-files"], Some(path)).await?;
    if !output.status.success() {
        return Err(Error::Storage(format!(
            "git ls-files failed in {}: {}",
            path.display(),
            process::failure_reason(&output)
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.to_string())
        .collect())
}

async fn languages(path: &Path) -> Result<Vec<LanguageCount>> {
    let files = tracked_files(path).await?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in &files {
        let extension = Path::new(file)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "(none)".to_string());
        *counts.entry(extension).or_default() += 1;
    }

    let mut languages: Vec<LanguageCount> = counts
        .into_iter()
        .map(|(extension, files)| LanguageCount { extension, files })
        .collect();
    languages.sort_by(|a, b| b.files.cmp(&a.files).then(a.extension.cmp(&b.extension)));
    languages.truncate(TOP_LANGUAGES);

    Ok(languages)
}

async fn total_lines(path: &Path) -> Result<u64> {
    let files = tracked_files(path).await?;
    let root = path.to_path_buf();

    // file reads are blocking; keep them off the async workers
    tokio::task::spawn_blocking(move || count_lines(&root, &files))
        .await
        .map_err(|e| Error::Storage(format!("line counting task failed: {e}")))
}

fn count_lines(root: &Path, files: &[String]) -> u64 {
    let mut total = 0u64;
    for file in files {
        let Ok(bytes) = std::fs::read(root.join(file)) else {
            continue;
        };
        // binary files don't have meaningful line counts
        if bytes.iter().take(1024).any(|b| *b == 0) {
            continue;
        }
        total += bytes.iter().filter(|b| **b == b'\n').count() as u64;
    }
    total
}

async fn contributors(path: &Path) -> Result<Vec<Contributor>> {
    let output = process::git(&["log", "--format=%an"], Some(path)).await?;
    if !output.status.success() {
        return Err(Error::Storage(format!(
            "git log failed in {}: {}",
            path.display(),
            process::failure_reason(&output)
        )));
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for author in String::from_utf8_lossy(&output.stdout).lines() {
        let author = author.trim();
        if !author.is_empty() {
            *counts.entry(author.to_string()).or_default() += 1;
        }
    }

    let mut contributors: Vec<Contributor> = counts
        .into_iter()
        .map(|(name, commits)| Contributor { name, commits })
        .collect();
    contributors.sort_by(|a, b| b.commits.cmp(&a.commits).then(a.name.cmp(&b.name)));
    contributors.truncate(TOP_CONTRIBUTORS);

    Ok(contributors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_collect_on_fixture_repo() {
        let temp = TempDir::new().unwrap();
        fixtures::init_repo(temp.path());
        std::fs::write(temp.path().join("lib.rs"), "fn main() {}\n// two lines\n").unwrap();
        fixtures::git(temp.path(), &["add", "."]);
        fixtures::git(temp.path(), &["commit", "-m", "add source"]);

        let stats = collect(temp.path()).await.unwrap();

        let rs = stats
            .languages
            .iter()
            .find(|l| l.extension == "rs")
            .expect("rs files counted");
        assert_eq!(rs.files, 1);

        // README.md (1 line) + lib.rs (2 lines)
        assert_eq!(stats.total_lines, 3);

        assert_eq!(stats.contributors.len(), 1);
        assert_eq!(stats.contributors[0].name, "Fixtures");
        assert_eq!(stats.contributors[0].commits, 2);
    }

    #[tokio::test]
    async fn test_collect_outside_a_repo_fails() {
        let temp = TempDir::new().unwrap();
        let result = collect(temp.path()).await;
        assert!(result.is_err());
    }
}
