//! External git invocation
//!
//! Every call disables interactive credential prompting (a non-interactive
//! environment must never hang waiting for a password) and is bounded by a
//! deadline; an expired deadline kills the subprocess and surfaces as
//! [`Error::Timeout`].

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::{Error, Result};

/// Deadline for clone/pull/fetch and other repository-sized operations
pub(crate) const GIT_DEADLINE: Duration = Duration::from_secs(300);

/// Run `git` with the default deadline
pub(crate) async fn git(args: &[&str], cwd: Option<&Path>) -> Result<Output> {
    git_with_deadline(args, cwd, GIT_DEADLINE).await
}

/// Run `git` with an explicit deadline
pub(crate) async fn git_with_deadline(
    args: &[&str],
    cwd: Option<&Path>,
    deadline: Duration,
) -> Result<Output> {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    tracing::debug!(?args, cwd = ?cwd, "running git");

    match tokio::time::timeout(deadline, cmd.output()).await {
        Ok(result) => result.map_err(Error::Io),
        Err(_) => Err(Error::Timeout {
            operation: args.first().copied().unwrap_or("").to_string(),
            seconds: deadline.as_secs(),
        }),
    }
}

/// Condense a failed invocation's stderr into a one-line reason
///
/// Recognizes the common auth/network/missing-repo shapes of git's output so
/// command-boundary messages stay readable.
pub(crate) fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("could not read Username")
    {
        format!("authentication required ({})", first_line(stderr))
    } else if stderr.contains("Could not resolve host") || stderr.contains("unable to access") {
        format!("network error ({})", first_line(stderr))
    } else if stderr.contains("not found") || stderr.contains("does not exist") {
        format!("repository not found ({})", first_line(stderr))
    } else if stderr.is_empty() {
        format!("exit status {}", output.status)
    } else {
        first_line(stderr).to_string()
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn fake_output(stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(256),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_git_version_succeeds() {
        let output = git(&["--version"], None).await.unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).starts_with("git version"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        // callers classify failures; the runner only reports them
        let output = git(&["not-a-real-subcommand"], None).await.unwrap();
        assert!(!output.status.success());
    }

    #[test]
    fn test_failure_reason_classifies_auth() {
        let output = fake_output("fatal: Authentication failed for 'https://x'");
        assert!(failure_reason(&output).starts_with("authentication required"));
    }

    #[test]
    fn test_failure_reason_classifies_network() {
        let output = fake_output("fatal: Could not resolve host: github.com");
        assert!(failure_reason(&output).starts_with("network error"));
    }

    #[test]
    fn test_failure_reason_classifies_missing_repo() {
        let output = fake_output("fatal: repository 'https://x' not found");
        assert!(failure_reason(&output).starts_with("repository not found"));
    }

    #[test]
    fn test_failure_reason_keeps_first_line() {
        let output = fake_output("fatal: something odd\nhint: more context");
        assert_eq!(failure_reason(&output), "fatal: something odd");
    }
}
