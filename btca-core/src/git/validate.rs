//! Pre-flight validation of candidate repo URLs
//!
//! A read-only remote probe gates every `add`; nothing is written locally
//! and credential prompting is disabled, so an auth-required remote fails
//! the same way an unreachable one does.

use std::time::Duration;

use crate::{Error, Result};

use super::process;

const VALIDATE_DEADLINE: Duration = Duration::from_secs(30);

/// Check that a URL is a reachable git remote
///
/// Accepts anything `git ls-remote` accepts, including local filesystem
/// paths. Scheme-qualified URLs are parsed first so obviously malformed
/// input fails without spawning a subprocess.
pub async fn validate_remote(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::ValidationFailed {
            url: url.to_string(),
            reason: "empty URL".to_string(),
        });
    }

    if url.contains("://") {
        url::Url::parse(url).map_err(|e| Error::ValidationFailed {
            url: url.to_string(),
            reason: format!("malformed URL: {e}"),
        })?;
    }

    let output = process::git_with_deadline(&["ls-remote", url, "HEAD"], None, VALIDATE_DEADLINE)
        .await
        .map_err(|e| match e {
            Error::Timeout { seconds, .. } => Error::ValidationFailed {
                url: url.to_string(),
                reason: format!("timed out after {seconds}s"),
            },
            other => other,
        })?;

    if !output.status.success() {
        return Err(Error::ValidationFailed {
            url: url.to_string(),
            reason: process::failure_reason(&output),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_fixture_repo_validates() {
        let temp = TempDir::new().unwrap();
        fixtures::init_repo(temp.path());

        validate_remote(&temp.path().to_string_lossy()).await.unwrap();
    }

    #[tokio::test]
    async fn test_nonexistent_path_fails() {
        let result = validate_remote("/nonexistent/btca-validate-test").await;
        assert!(matches!(result, Err(Error::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn test_plain_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = validate_remote(&temp.path().to_string_lossy()).await;
        assert!(matches!(result, Err(Error::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn test_malformed_url_fails_without_probe() {
        let result = validate_remote("https://exa mple.com/repo.git").await;
        assert!(matches!(result, Err(Error::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn test_empty_url_fails() {
        let result = validate_remote("").await;
        assert!(matches!(result, Err(Error::ValidationFailed { .. })));
    }
}
