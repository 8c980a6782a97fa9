//! Registry service owning the configuration document
//!
//! One `Registry` instance owns the live in-memory config (directories
//! expanded) and its on-disk path. Handlers receive a handle to it rather
//! than reaching for a global; every mutation replaces the document and
//! synchronously rewrites the whole file (home-collapsed) before returning.

use std::path::{Path, PathBuf};

use crate::config::{Config, RepoEntry, LOCAL_REPO};
use crate::git::{ensure_local, validate_remote, RepoLocks, ResolvedRepo};
use crate::{clean, paths, store};
use crate::{Error, Result};

/// Owner of the configuration document
#[derive(Debug)]
pub struct Registry {
    config: Config,
    path: PathBuf,
}

impl Registry {
    /// Open the registry at the per-user config path
    pub fn open_default() -> Result<Self> {
        Self::open_at(paths::config_file()?)
    }

    /// Open the registry backed by an explicit config file
    ///
    /// An absent file is seeded with the built-in default set and persisted.
    /// A malformed or schema-invalid file degrades to the defaults without
    /// being rewritten; the next mutation repairs it on disk.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let first_run = !path.exists();

        let mut loaded: Config = store::load_or(&path, Config::default)?;
        if let Err(reason) = loaded.check() {
            tracing::warn!(
                path = %path.display(),
                %reason,
                "configuration failed validation, falling back to defaults"
            );
            loaded = Config::default();
        }

        let registry = Self {
            config: loaded.expanded(),
            path,
        };

        if first_run {
            registry.persist()?;
        }

        Ok(registry)
    }

    /// The live configuration (directories expanded)
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the configuration document lives on disk
    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// The configured repos, in insertion order
    pub fn repos(&self) -> &[RepoEntry] {
        &self.config.repos
    }

    /// Register a new repo
    ///
    /// The name must be unused and the URL must pass the remote probe; no
    /// persistence happens when either check fails.
    pub async fn add_repo(&mut self, entry: RepoEntry) -> Result<()> {
        if entry.name == LOCAL_REPO {
            return Err(Error::LocalPseudoRepo("registered"));
        }
        if self.config.find_repo(&entry.name).is_some() {
            return Err(Error::AlreadyExists(entry.name));
        }

        validate_remote(&entry.url).await?;

        self.config.repos.push(entry);
        self.persist()
    }

    /// Remove a repo from the registry
    ///
    /// With `delete_files`, the clone directory is removed first and a
    /// failed removal aborts the whole operation, so the registry entry is
    /// never dropped while its files linger.
    pub fn remove_repo(&mut self, name: &str, delete_files: bool) -> Result<RepoEntry> {
        let index = self
            .config
            .repos
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        if delete_files {
            clean::clean_one(&self.config.repos_directory, name)?;
        }

        let entry = self.config.repos.remove(index);
        self.persist()?;
        Ok(entry)
    }

    /// Update the model/provider pair
    pub fn set_model(&mut self, provider: impl Into<String>, model: impl Into<String>) -> Result<()> {
        self.config.provider = provider.into();
        self.config.model = model.into();
        self.persist()
    }

    /// Restore the built-in default configuration
    pub fn reset(&mut self) -> Result<()> {
        self.config = Config::default().expanded();
        self.persist()
    }

    /// Write the current configuration (home-collapsed) to an arbitrary path
    pub fn export(&self, target: &Path) -> Result<()> {
        store::save(target, &self.config.collapsed())
    }

    /// Replace the configuration with a document read from an arbitrary path
    ///
    /// All-or-nothing: any parse or schema failure leaves the current
    /// configuration untouched.
    pub fn import(&mut self, source: &Path) -> Result<()> {
        let imported: Config = store::load_strict(source)?;
        imported.check().map_err(Error::Schema)?;

        self.config = imported.expanded();
        self.persist()
    }

    /// Clone or fast-forward every registered repo
    ///
    /// Repos are visited sequentially in registry order; the first failure
    /// aborts the remaining iterations.
    pub async fn update_all(&self, locks: &RepoLocks) -> Result<Vec<ResolvedRepo>> {
        let mut updated = Vec::with_capacity(self.config.repos.len());

        for entry in &self.config.repos {
            let resolved = ensure_local(&self.config, &entry.name, locks).await?;
            updated.push(resolved);
        }

        Ok(updated)
    }

    fn persist(&self) -> Result<()> {
        store::save(&self.path, &self.config.collapsed())
    }
}
