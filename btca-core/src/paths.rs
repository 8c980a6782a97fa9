//! Home-relative path handling
//!
//! Persisted documents store directories in `~`-prefixed form so a config
//! file can move between machines; in memory every path is absolute.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name of the configuration document
pub const CONFIG_FILE: &str = "config.json";

/// File name of the question/answer history document
pub const HISTORY_FILE: &str = "history.json";

/// File name of the bookmarks document
pub const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Get the btca state directory (`~/.config/btca` on Unix)
pub fn state_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("btca"))
        .ok_or_else(|| Error::Storage("could not determine config directory".to_string()))
}

/// Path of the configuration document
pub fn config_file() -> Result<PathBuf> {
    Ok(state_dir()?.join(CONFIG_FILE))
}

/// Path of the history document
pub fn history_file() -> Result<PathBuf> {
    Ok(state_dir()?.join(HISTORY_FILE))
}

/// Path of the bookmarks document
pub fn bookmarks_file() -> Result<PathBuf> {
    Ok(state_dir()?.join(BOOKMARKS_FILE))
}

/// Expand a leading `~` to the user's home directory
///
/// Paths that do not start with `~`, and paths on systems where the home
/// directory cannot be determined, are returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }

    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}

/// Collapse a path under the home directory back to `~/...` form
///
/// Paths outside the home directory are returned unchanged. Inverse of
/// [`expand_tilde`] for home-rooted paths.
pub fn collapse_tilde(path: &Path) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return PathBuf::from("~");
            }
            return PathBuf::from("~").join(rest);
        }
    }

    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_prefixed() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_tilde(Path::new("~/projects/btca")),
            home.join("projects/btca")
        );
    }

    #[test]
    fn test_expand_bare_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~")), home);
    }

    #[test]
    fn test_expand_leaves_absolute_paths_alone() {
        assert_eq!(
            expand_tilde(Path::new("/var/tmp/repos")),
            PathBuf::from("/var/tmp/repos")
        );
    }

    #[test]
    fn test_collapse_home_rooted() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            collapse_tilde(&home.join(".config/btca/repos")),
            PathBuf::from("~/.config/btca/repos")
        );
    }

    #[test]
    fn test_collapse_leaves_foreign_paths_alone() {
        assert_eq!(
            collapse_tilde(Path::new("/var/tmp/repos")),
            PathBuf::from("/var/tmp/repos")
        );
    }

    #[test]
    fn test_expand_collapse_are_inverses_under_home() {
        let collapsed = PathBuf::from("~/some/nested/dir");
        let roundtrip = collapse_tilde(&expand_tilde(&collapsed));
        assert_eq!(roundtrip, collapsed);
    }
}
