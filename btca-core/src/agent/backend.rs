//! Backend abstraction over provider CLIs

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::{Error, Result};

/// Trait for question-answering agent backends
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend (matches the config's `provider` field)
    fn name(&self) -> &'static str;

    /// Build the command to spawn this backend, sans prompt
    fn build_command(&self, model: &str, workdir: &Path) -> Command;

    /// Run the backend in a repo clone and capture its answer
    async fn ask(&self, prompt: &str, model: &str, workdir: &Path) -> Result<String>;

    /// Check if this backend is available on the system
    fn is_available(&self) -> bool;
}

async fn run_and_capture(
    mut cmd: Command,
    backend: &'static str,
    executable: &str,
) -> Result<String> {
    let output = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Agent(format!(
                "'{}' executable not found. Is {} installed?",
                executable, backend
            ))
        } else {
            Error::Io(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Agent(format!(
            "{} exited with {}: {}",
            backend,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_workdir(workdir: &Path) -> Result<()> {
    if !workdir.exists() {
        return Err(Error::Agent(format!(
            "working directory does not exist: {}",
            workdir.display()
        )));
    }
    Ok(())
}

/// opencode backend implementation
#[derive(Debug, Clone)]
pub struct OpencodeBackend {
    opencode_path: String,
}

impl OpencodeBackend {
    /// Create a new opencode backend with default settings
    pub fn new() -> Self {
        Self {
            opencode_path: "opencode".to_string(),
        }
    }

    /// Create an opencode backend with custom path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.opencode_path = path.into();
        self
    }
}

impl Default for OpencodeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for OpencodeBackend {
    fn name(&self) -> &'static str {
        "opencode"
    }

    fn build_command(&self, model: &str, workdir: &Path) -> Command {
        let mut cmd = Command::new(&self.opencode_path);
        cmd.arg("run").arg("--model").arg(model);
        cmd.current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    async fn ask(&self, prompt: &str, model: &str, workdir: &Path) -> Result<String> {
        check_workdir(workdir)?;

        let mut cmd = self.build_command(model, workdir);
        cmd.arg(prompt);

        run_and_capture(cmd, "opencode", &self.opencode_path).await
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.opencode_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }
}

/// Claude Code backend implementation
#[derive(Debug, Clone)]
pub struct ClaudeBackend {
    claude_path: String,
}

impl ClaudeBackend {
    /// Create a new Claude backend with default settings
    pub fn new() -> Self {
        Self {
            claude_path: "claude".to_string(),
        }
    }

    /// Create a Claude backend with custom path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.claude_path = path.into();
        self
    }
}

impl Default for ClaudeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for ClaudeBackend {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn build_command(&self, model: &str, workdir: &Path) -> Command {
        let mut cmd = Command::new(&self.claude_path);
        cmd.arg("--print").arg("--model").arg(model);
        cmd.current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    async fn ask(&self, prompt: &str, model: &str, workdir: &Path) -> Result<String> {
        check_workdir(workdir)?;

        let mut cmd = self.build_command(model, workdir);
        cmd.arg(prompt);

        run_and_capture(cmd, "claude", &self.claude_path).await
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.claude_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }
}

/// Resolve the backend for a config's `provider` field
pub fn backend_for(provider: &str) -> Result<Box<dyn Backend>> {
    match provider {
        "opencode" => Ok(Box::new(OpencodeBackend::new())),
        "claude" => Ok(Box::new(ClaudeBackend::new())),
        other => Err(Error::Agent(format!(
            "unknown provider '{}', expected one of: opencode, claude",
            other
        ))),
    }
}
