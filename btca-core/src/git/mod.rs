//! Git operations for btca
//!
//! All mutating git operations run the external `git` binary with credential
//! prompting disabled and a bounded deadline; `git2` is used only to inspect
//! existing clones before they are touched.

pub(crate) mod process;
mod status;
mod sync;
mod validate;

pub use status::{Classification, RepoStatus};
pub use sync::{ensure_local, RepoLocks, ResolvedRepo};
pub use validate::validate_remote;

pub use status::evaluate as evaluate_status;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;
    use std::process::Command;

    /// Run a git command in a fixture directory, panicking on failure
    pub(crate) fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Initialize a repository with one commit on `main`
    pub(crate) fn init_repo(dir: &Path) {
        git(dir, &["init", "-b", "main"]);
        git(dir, &["config", "user.email", "fixtures@example.com"]);
        git(dir, &["config", "user.name", "Fixtures"]);
        std::fs::write(dir.join("README.md"), "# fixture\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "initial commit"]);
    }

    /// Add a commit touching `file` in an existing fixture repository
    pub(crate) fn commit_change(dir: &Path, file: &str, contents: &str) {
        std::fs::write(dir.join(file), contents).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "update"]);
    }

    /// Current HEAD commit id of a fixture repository
    pub(crate) fn head_commit(dir: &Path) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(dir)
            .output()
            .expect("failed to run git rev-parse");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
