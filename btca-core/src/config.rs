//! The persisted configuration document
//!
//! One JSON document per user at `~/.config/btca/config.json`. Directories
//! are stored home-collapsed (`~/...`) and expanded to absolute paths in
//! memory; the whole document is rewritten on every mutation. Unknown or
//! missing fields invalidate the entire document rather than merging
//! partially.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

/// Reserved repo name resolving to the process working directory
pub const LOCAL_REPO: &str = "local";

/// Default port for the HTTP endpoint
pub const DEFAULT_PORT: u16 = 3420;

/// Default cap on concurrently spawned agent instances
pub const DEFAULT_MAX_INSTANCES: u32 = 5;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "big-pickle";

/// Default provider identifier
pub const DEFAULT_PROVIDER: &str = "opencode";

fn default_branch() -> String {
    "main".to_string()
}

/// A named reference to a remote git repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepoEntry {
    /// Unique key, also the clone directory name under `reposDirectory`
    pub name: String,

    /// A git-fetchable URL (remote URL or local filesystem path)
    pub url: String,

    /// Tracking branch
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Free text passed through to the agent prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
}

impl RepoEntry {
    /// Create an entry on the default branch with no notes
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            branch: default_branch(),
            special_notes: None,
        }
    }
}

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Directory holding prompt templates
    pub prompts_directory: PathBuf,

    /// Directory holding local clones, one subdirectory per repo name
    pub repos_directory: PathBuf,

    /// Port the HTTP endpoint binds to
    pub port: u16,

    /// Cap on concurrently spawned agent instances
    pub max_instances: u32,

    /// Configured repos, in insertion order
    pub repos: Vec<RepoEntry>,

    /// Model identifier handed to the agent backend
    pub model: String,

    /// Agent backend selector
    pub provider: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompts_directory: PathBuf::from("~/.config/btca/prompts"),
            repos_directory: PathBuf::from("~/.config/btca/repos"),
            port: DEFAULT_PORT,
            max_instances: DEFAULT_MAX_INSTANCES,
            repos: default_repos(),
            model: DEFAULT_MODEL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
        }
    }
}

/// The built-in repo set seeded on first run
pub fn default_repos() -> Vec<RepoEntry> {
    vec![RepoEntry {
        name: "svelte".to_string(),
        url: "https://github.com/sveltejs/svelte.dev".to_string(),
        branch: "main".to_string(),
        special_notes: Some(
            "Documentation site for Svelte and SvelteKit; prefer content under \
             apps/svelte.dev/content when answering."
                .to_string(),
        ),
    }]
}

impl Config {
    /// Return a copy with both directories expanded to absolute paths
    pub fn expanded(mut self) -> Self {
        self.prompts_directory = paths::expand_tilde(&self.prompts_directory);
        self.repos_directory = paths::expand_tilde(&self.repos_directory);
        self
    }

    /// Return a copy with both directories collapsed to `~/...` form
    ///
    /// This is the shape written to disk and produced by export.
    pub fn collapsed(&self) -> Self {
        let mut copy = self.clone();
        copy.prompts_directory = paths::collapse_tilde(&copy.prompts_directory);
        copy.repos_directory = paths::collapse_tilde(&copy.repos_directory);
        copy
    }

    /// Validate the document invariants serde cannot express
    pub fn check(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be a positive integer".to_string());
        }
        if self.max_instances == 0 {
            return Err("maxInstances must be a positive integer".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for repo in &self.repos {
            if repo.name.trim().is_empty() {
                return Err("repo names must be non-empty".to_string());
            }
            if repo.name == LOCAL_REPO {
                return Err(format!("'{}' is a reserved repo name", LOCAL_REPO));
            }
            if repo.branch.trim().is_empty() {
                return Err(format!("repo '{}' has an empty branch", repo.name));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(format!("duplicate repo name '{}'", repo.name));
            }
        }

        Ok(())
    }

    /// Look up a repo by name
    pub fn find_repo(&self, name: &str) -> Option<&RepoEntry> {
        self.repos.iter().find(|r| r.name == name)
    }

    /// Compute the local clone directory for a repo name
    pub fn local_path(&self, name: &str) -> PathBuf {
        self.repos_directory.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3420);
        assert_eq!(config.max_instances, 5);
        assert_eq!(config.model, "big-pickle");
        assert_eq!(config.provider, "opencode");
        assert!(config.find_repo("svelte").is_some());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"promptsDirectory\""));
        assert!(json.contains("\"reposDirectory\""));
        assert!(json.contains("\"maxInstances\""));
    }

    #[test]
    fn test_branch_defaults_to_main() {
        let entry: RepoEntry =
            serde_json::from_str(r#"{"name": "x", "url": "https://example.com/x.git"}"#).unwrap();
        assert_eq!(entry.branch, "main");
        assert!(entry.special_notes.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let raw = r#"{
            "promptsDirectory": "~/.config/btca/prompts",
            "reposDirectory": "~/.config/btca/repos",
            "port": 3420,
            "maxInstances": 5,
            "repos": [],
            "model": "m",
            "provider": "p",
            "surprise": true
        }"#;
        assert!(serde_json::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let raw = r#"{"repos": []}"#;
        assert!(serde_json::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn test_check_rejects_duplicate_names() {
        let mut config = Config::default();
        config
            .repos
            .push(RepoEntry::new("svelte", "https://example.com/other.git"));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_reserved_name() {
        let mut config = Config::default();
        config
            .repos
            .push(RepoEntry::new(LOCAL_REPO, "https://example.com/x.git"));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_zero_port() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_expand_collapse_roundtrip() {
        let config = Config::default();
        let expanded = config.clone().expanded();
        assert!(expanded.repos_directory.is_absolute());
        assert_eq!(expanded.collapsed(), config);
    }
}
