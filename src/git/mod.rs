//! Version-control adapter: each operation shells out to a single git
//! command and returns trimmed text output.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

/// Snapshot of the working tree, captured once per run.
#[derive(Debug, Clone)]
pub struct GitChanges {
    /// Short-format status output.
    pub status: String,
    /// Staged diff if present, otherwise the unstaged diff.
    pub diff: String,
    /// Whether the staged diff is non-empty.
    pub has_staged_changes: bool,
    /// Whether the unstaged diff is non-empty.
    pub has_unstaged_changes: bool,
}

/// Git operations required by the workflow.
///
/// Implemented by [`GitOperations`] against a real repository; tests drive
/// the workflow with an in-memory fake instead.
pub trait GitOps {
    /// Returns true iff the working directory is inside a git work tree.
    fn is_repository(&self) -> bool;

    /// Captures the current change snapshot.
    fn get_changes(&self) -> Result<GitChanges>;

    /// Returns true iff the status output is non-empty.
    fn has_changes(&self) -> Result<bool>;

    /// Returns the staged diff, or an empty string when it cannot be read.
    fn staged_diff(&self) -> String;

    /// Returns true iff `name` resolves to an existing ref.
    fn branch_exists(&self, name: &str) -> bool;

    /// Creates and checks out a new branch.
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Stages all changes.
    fn stage_all(&self) -> Result<()>;

    /// Creates a commit with the given message.
    fn commit(&self, message: &str) -> Result<()>;

    /// Pushes the branch to `origin`.
    fn push(&self, branch: &str) -> Result<()>;
}

/// Builds the commit command line, escaping double quotes in the message so
/// message content cannot break out of the `-m` argument.
pub fn commit_command(message: &str) -> String {
    let escaped = message.replace('"', "\\\"");
    format!("git commit -m \"{escaped}\"")
}

/// Shell-based git adapter.
pub struct GitOperations {
    work_dir: Option<PathBuf>,
}

impl Default for GitOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOperations {
    /// Creates an adapter running in the current directory.
    pub fn new() -> Self {
        Self { work_dir: None }
    }

    /// Creates an adapter pinned to a specific working directory.
    pub fn at_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            work_dir: Some(path.into()),
        }
    }

    /// Runs a command through the shell and returns trimmed stdout.
    ///
    /// A non-zero exit or a spawn failure is an error carrying the offending
    /// command and git's stderr.
    fn exec(&self, command: &str) -> Result<String> {
        debug!(command, "[GIT] running");

        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        if let Some(ref dir) = self.work_dir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute: {command}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {command}\n{}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs a command, mapping any failure to an empty string.
    ///
    /// Some repository states legitimately produce no diff; treat those the
    /// same as empty output rather than failing the run.
    fn exec_ignore_errors(&self, command: &str) -> String {
        self.exec(command).unwrap_or_default()
    }

    /// Runs a command and reports only whether it succeeded.
    fn probe(&self, command: &str) -> bool {
        self.exec(command).is_ok()
    }

    /// Returns short-format status output. Fatal if status cannot be read.
    fn status(&self) -> Result<String> {
        self.exec("git status --short")
    }
}

impl GitOps for GitOperations {
    fn is_repository(&self) -> bool {
        self.probe("git rev-parse --is-inside-work-tree")
    }

    fn get_changes(&self) -> Result<GitChanges> {
        let status = self.status()?;
        let staged = self.exec_ignore_errors("git diff --cached");
        let unstaged = self.exec_ignore_errors("git diff");

        let has_staged_changes = !staged.is_empty();
        let has_unstaged_changes = !unstaged.is_empty();
        let diff = if has_staged_changes { staged } else { unstaged };

        Ok(GitChanges {
            status,
            diff,
            has_staged_changes,
            has_unstaged_changes,
        })
    }

    fn has_changes(&self) -> Result<bool> {
        Ok(!self.status()?.is_empty())
    }

    fn staged_diff(&self) -> String {
        self.exec_ignore_errors("git diff --cached")
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.probe(&format!("git rev-parse --verify {name}"))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.exec(&format!("git checkout -b {name}"))?;
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.exec("git add .")?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.exec(&commit_command(message))?;
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<()> {
        self.exec(&format!("git push origin {branch}"))?;
        Ok(())
    }
}
