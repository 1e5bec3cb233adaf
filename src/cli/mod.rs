//! CLI interface for git-ai-commit.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod config;

use crate::config::{ConfigManager, Provider};
use crate::workflow::Workflow;

/// git-ai-commit: automate git workflow with AI-generated branch names and
/// commit messages.
#[derive(Parser)]
#[command(name = "git-ai-commit")]
#[command(
    about = "Automate git workflow with AI-generated branch names and commit messages",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// LLM provider: openai|anthropic|gemini.
    #[arg(long, value_name = "name")]
    pub provider: Option<String>,

    /// Show what would be done without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed logging.
    #[arg(long)]
    pub verbose: bool,

    /// Optional subcommand; without one the workflow runs.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration settings.
    Config(config::ConfigCommand),
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` raises the default level
/// to debug for this crate.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "git_ai_commit=debug" } else { "warn" };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init();
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Some(Commands::Config(cmd)) => {
                init_tracing(false);
                cmd.execute(&ConfigManager::new())
            }
            None => {
                let cli_provider: Option<Provider> =
                    self.provider.as_deref().map(str::parse).transpose()?;

                let manager = ConfigManager::new();
                let options = manager.resolve(
                    cli_provider,
                    // Flags can only assert true; absence defers to the
                    // config file.
                    self.dry_run.then_some(true),
                    self.verbose.then_some(true),
                );

                init_tracing(options.verbose);

                let workflow = Workflow::new(options)?;
                workflow.execute().await
            }
        }
    }
}
