//! # git-ai-commit
//!
//! Automates the commit-and-push loop: inspects the working tree, asks an
//! LLM provider for a branch name and a conventional commit message, then
//! creates the branch, stages, commits, and pushes.
//!
//! The flow is strictly sequential: one git command or one provider request
//! at a time, no retries, no background work. See [`workflow::Workflow`] for
//! the end-to-end sequence.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod git;
pub mod llm;
pub mod workflow;

pub use crate::cli::Cli;

/// The current version of git-ai-commit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
