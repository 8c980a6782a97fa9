//! Error types for btca

use thiserror::Error;

/// Result type alias for btca operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for btca operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown repo name
    #[error("repo '{0}' is not configured")]
    NotFound(String),

    /// Duplicate repo name on add
    #[error("repo '{0}' already exists")]
    AlreadyExists(String),

    /// Candidate URL is not a reachable git remote
    #[error("cannot reach '{url}': {reason}")]
    ValidationFailed { url: String, reason: String },

    /// git clone exited non-zero
    #[error("failed to clone '{name}': {reason}")]
    CloneFailed { name: String, reason: String },

    /// git pull exited non-zero
    #[error("failed to pull '{name}': {reason}")]
    PullFailed { name: String, reason: String },

    /// git fetch exited non-zero
    #[error("failed to fetch '{name}': {reason}")]
    FetchFailed { name: String, reason: String },

    /// Local directory exists but its origin does not match the registry entry
    #[error("'{name}' is checked out from '{found}', expected '{expected}'")]
    RemoteMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Local directory exists but is not a git work tree
    #[error("'{name}' exists at {path} but is not a git work tree")]
    InvalidClone { name: String, path: String },

    /// External git process exceeded its deadline
    #[error("git {operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// The reserved working-directory pseudo-repo was used where it cannot be
    #[error("'local' refers to the current working directory and cannot be {0}")]
    LocalPseudoRepo(&'static str),

    /// Filesystem read/write failure other than "absent"
    #[error("storage error: {0}")]
    Storage(String),

    /// Malformed document on import or decode
    #[error("invalid document: {0}")]
    Schema(String),

    /// Agent backend failure
    #[error("agent error: {0}")]
    Agent(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
