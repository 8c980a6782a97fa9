//! Generic persistence of one JSON document at a fixed path
//!
//! Two loading modes with deliberately different strictness: [`load_or`]
//! degrades to a caller-supplied default when the file is absent, empty, or
//! malformed (the live config and history files must never brick the tool),
//! while [`load_strict`] surfaces every parse and schema failure (explicit
//! imports are all-or-nothing).

use std::io::ErrorKind;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::{Error, Result};

/// Load a document, falling back to a default
///
/// The parent directory is created if missing. Absent, empty, and malformed
/// files all yield `default()`; malformed content is logged and discarded.
/// Read failures other than "not found" surface as [`Error::Storage`].
pub fn load_or<T, F>(path: &Path, default: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    ensure_parent(path)?;

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(default()),
        Err(e) => {
            return Err(Error::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if raw.trim().is_empty() {
        return Ok(default());
    }

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "discarding malformed document, falling back to defaults"
            );
            Ok(default())
        }
    }
}

/// Load a document, treating any parse or schema failure as an error
pub fn load_strict<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Storage(format!("failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw)
        .map_err(|e| Error::Schema(format!("{}: {}", path.display(), e)))
}

/// Serialize a document as pretty-printed JSON and overwrite the file
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;

    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    std::fs::write(path, body).map_err(|e| {
        Error::Storage(format!("failed to write {}: {}", path.display(), e))
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Storage(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    fn fallback() -> Doc {
        Doc { value: 7 }
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/doc.json");

        let doc: Doc = load_or(&path, fallback).unwrap();
        assert_eq!(doc, fallback());
        // parent was created so a later save succeeds
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_load_empty_returns_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        std::fs::write(&path, "  \n").unwrap();

        let doc: Doc = load_or(&path, fallback).unwrap();
        assert_eq!(doc, fallback());
    }

    #[test]
    fn test_load_malformed_returns_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        std::fs::write(&path, "{ not json").unwrap();

        let doc: Doc = load_or(&path, fallback).unwrap();
        assert_eq!(doc, fallback());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");

        save(&path, &Doc { value: 42 }).unwrap();
        let doc: Doc = load_or(&path, fallback).unwrap();
        assert_eq!(doc.value, 42);
    }

    #[test]
    fn test_save_pretty_prints() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");

        save(&path, &Doc { value: 1 }).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n"));
        assert!(raw.contains("  \"value\": 1"));
    }

    #[test]
    fn test_load_strict_rejects_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        std::fs::write(&path, "{\"value\": \"not-a-number\"}").unwrap();

        let result: Result<Doc> = load_strict(&path);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_load_strict_rejects_missing() {
        let temp = TempDir::new().unwrap();
        let result: Result<Doc> = load_strict(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
