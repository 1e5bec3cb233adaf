//! End-to-end workflow: verify repository, snapshot changes, generate a
//! unique branch name, then branch, stage, commit, and push (or report what
//! would happen in dry-run mode).

use anyhow::Result;
use tracing::debug;

use crate::config::ResolvedOptions;
use crate::git::{commit_command, GitChanges, GitOperations, GitOps};
use crate::llm::Llm;

/// Orchestrates one run of the commit-and-push workflow.
///
/// Generic over [`GitOps`] so tests can drive the sequence against an
/// in-memory repository fake.
pub struct Workflow<G: GitOps> {
    git: G,
    llm: Llm,
    options: ResolvedOptions,
}

impl Workflow<GitOperations> {
    /// Creates a workflow against the current directory's repository,
    /// constructing the provider client for the resolved options.
    ///
    /// Fails before any side effect if the provider credential is missing.
    pub fn new(options: ResolvedOptions) -> Result<Self> {
        let llm = Llm::for_provider(options.provider)?;
        Ok(Self {
            git: GitOperations::new(),
            llm,
            options,
        })
    }
}

impl<G: GitOps> Workflow<G> {
    /// Creates a workflow from explicit parts.
    pub fn with_parts(git: G, llm: Llm, options: ResolvedOptions) -> Self {
        Self { git, llm, options }
    }

    /// Generates a branch name and suffixes it with `-1`, `-2`, … until no
    /// existing branch collides. Unbounded: a pathological collision
    /// sequence would keep counting.
    async fn generate_unique_branch_name(&self, changes: &GitChanges) -> Result<String> {
        debug!("Generating branch name with LLM");
        let base = self.llm.generate_branch_name(changes).await?;

        let mut candidate = base.clone();
        let mut suffix = 0u64;
        while self.git.branch_exists(&candidate) {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
            debug!(base = %base, candidate = %candidate, "Branch exists, trying suffixed name");
        }

        Ok(candidate)
    }

    /// Runs the workflow to completion.
    ///
    /// Returns `Ok(())` both on success and on the deliberate no-changes
    /// short-circuit. Any failure aborts the remaining steps; already
    /// performed steps (such as a created branch) are left in place.
    pub async fn execute(&self) -> Result<()> {
        debug!("Checking if current directory is a git repository");
        if !self.git.is_repository() {
            anyhow::bail!("Not inside a git repository");
        }

        debug!("Inspecting current changes");
        let changes = self.git.get_changes()?;

        if !self.git.has_changes()? {
            println!("No changes detected. Nothing to commit.");
            return Ok(());
        }

        debug!(status = %changes.status, "Found changes");

        let branch_name = self.generate_unique_branch_name(&changes).await?;
        println!("\nGenerated branch name: {branch_name}");

        if self.options.dry_run {
            println!("\n[DRY RUN] Would execute:");
            println!("  git checkout -b {branch_name}");
            println!("  git add .");
        } else {
            debug!("Creating new branch");
            self.git.create_branch(&branch_name)?;
            println!("Created and checked out branch: {branch_name}");

            debug!("Staging all changes");
            self.git.stage_all()?;
            println!("Staged all changes");
        }

        // A dry run must not stage, so reuse the snapshot diff instead of
        // reading the staged diff back.
        let staged_diff = if self.options.dry_run {
            changes.diff.clone()
        } else {
            self.git.staged_diff()
        };

        debug!("Generating commit message with LLM");
        let commit_message = self.llm.generate_commit_message(&staged_diff).await?;
        println!("\nGenerated commit message:\n  \"{commit_message}\"");

        if self.options.dry_run {
            println!("  {}", commit_command(&commit_message));
            println!("  git push origin {branch_name}");
            println!("\n[DRY RUN] No changes were made to the repository.");
        } else {
            debug!("Creating commit");
            self.git.commit(&commit_message)?;
            println!("Created commit");

            debug!("Pushing to remote");
            self.git.push(&branch_name)?;
            println!("Pushed to origin/{branch_name}");

            println!("\nAll done! Your changes have been committed and pushed.");
        }

        Ok(())
    }
}
